//! Withdraw Handler

use std::sync::Arc;

use crate::aggregate::Aggregate;
use crate::domain::DomainError;
use crate::error::AppResult;
use crate::store::Store;

use super::{load_account, parse_amount, save_account, WithdrawCommand, WithdrawResult};

/// Handler for withdrawals
pub struct WithdrawHandler {
    store: Arc<dyn Store>,
}

impl WithdrawHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Execute the withdraw command.
    ///
    /// Payroll accounts reject withdrawals whatever their balance; their
    /// funds leave only by transfer to an account of the same client.
    pub async fn execute(&self, command: WithdrawCommand) -> AppResult<WithdrawResult> {
        let mut account = load_account(self.store.as_ref(), command.account_id).await?;
        let amount = parse_amount(command.amount)?;

        account.ensure_active()?;

        if !account.kind().allows_withdrawal() {
            return Err(DomainError::WithdrawalNotAllowed {
                kind: account.kind(),
            }
            .into());
        }

        account.debit(amount.value())?;

        save_account(self.store.as_ref(), &account).await?;

        tracing::info!("Withdrawal from {}: {}", account.id(), amount);

        Ok(WithdrawResult {
            account_id: account.id(),
            amount: amount.value(),
            balance: account.balance().value(),
        })
    }
}
