//! Transfer Handler
//!
//! Two-account movement of funds. All validation and both balance
//! mutations happen in memory; the store then commits both accounts as
//! one unit.

use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::{Account, Aggregate};
use crate::domain::{Amount, DomainError};
use crate::error::AppResult;
use crate::store::{Store, TransferCommit};

use super::{parse_amount, TransferCommand, TransferResult};

/// Handler for transfers between accounts
pub struct TransferHandler {
    store: Arc<dyn Store>,
}

impl TransferHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Execute the transfer command
    pub async fn execute(&self, command: TransferCommand) -> AppResult<TransferResult> {
        let commit = self.prepare(&command).await?;

        self.store.commit_transfer(&commit).await?;

        tracing::info!(
            "Transfer committed: {} -> {} ({})",
            commit.source.id(),
            commit.destination.id(),
            command.amount
        );

        Ok(TransferResult {
            source_account_id: commit.source.id(),
            destination_account_id: commit.destination.id(),
            amount: command.amount,
            source_balance: commit.source.balance().value(),
            destination_balance: commit.destination.balance().value(),
        })
    }

    /// Validate the transfer and compute both resulting account states
    /// without persisting anything.
    pub async fn prepare(&self, command: &TransferCommand) -> AppResult<TransferCommit> {
        let amount = parse_amount(command.amount)?;

        let (source, destination) = self
            .load_pair(command.source_account_id, command.destination_account_id)
            .await?;

        Ok(Self::apply(source, destination, amount)?)
    }

    /// Load both sides; fails with `AccountsNotFound` if either is missing
    pub async fn load_pair(
        &self,
        source_account_id: Uuid,
        destination_account_id: Uuid,
    ) -> AppResult<(Account, Account)> {
        let source = self.store.get_account(source_account_id).await?;
        let destination = self.store.get_account(destination_account_id).await?;

        match (source, destination) {
            (Some(source), Some(destination)) => Ok((source, destination)),
            _ => Err(DomainError::AccountsNotFound.into()),
        }
    }

    /// Transfer rules, in order: distinct accounts, both active, same owner
    /// for restricted source kinds, then debit source and credit
    /// destination. Only the source kind is consulted for the same-owner
    /// rule.
    pub fn apply(
        mut source: Account,
        mut destination: Account,
        amount: Amount,
    ) -> Result<TransferCommit, DomainError> {
        if source.id() == destination.id() {
            return Err(DomainError::SameAccountTransfer);
        }

        source.ensure_active()?;
        destination.ensure_active()?;

        if source.kind().requires_same_owner_transfer()
            && source.client_id() != destination.client_id()
        {
            return Err(DomainError::SameOwnerRequired {
                kind: source.kind(),
            });
        }

        source.debit(amount.value())?;
        destination.credit(amount.value())?;

        Ok(TransferCommit {
            source,
            destination,
            record: None,
        })
    }
}
