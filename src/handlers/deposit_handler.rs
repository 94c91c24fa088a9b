//! Deposit Handler
//!
//! Credits an active account, adding the configured surcharge to
//! qualifying deposits.

use std::sync::Arc;

use crate::aggregate::Aggregate;
use crate::config::LedgerConfig;
use crate::error::AppResult;
use crate::store::Store;

use super::{load_account, parse_amount, save_account, DepositCommand, DepositResult};

/// Handler for deposits
pub struct DepositHandler {
    store: Arc<dyn Store>,
    config: LedgerConfig,
}

impl DepositHandler {
    pub fn new(store: Arc<dyn Store>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Execute the deposit command
    pub async fn execute(&self, command: DepositCommand) -> AppResult<DepositResult> {
        let mut account = load_account(self.store.as_ref(), command.account_id).await?;
        let amount = parse_amount(command.amount)?;

        account.ensure_active()?;

        let credited = self.config.surcharged_amount(account.kind(), amount.value())?;
        account.credit(credited)?;

        save_account(self.store.as_ref(), &account).await?;

        tracing::info!(
            "Deposit into {}: requested {}, credited {}",
            account.id(),
            amount,
            credited
        );

        Ok(DepositResult {
            account_id: account.id(),
            amount: amount.value(),
            credited,
            balance: account.balance().value(),
        })
    }
}
