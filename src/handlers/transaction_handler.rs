//! Transaction Handler
//!
//! Records transactions. Funds move through the transfer engine; the
//! record is committed together with both account updates.

use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::{Account, Aggregate, Transaction};
use crate::domain::{DomainError, TransactionKind};
use crate::error::AppResult;
use crate::store::Store;

use super::{
    parse_amount, AccountView, RecordTransactionCommand, TransactionDetails, TransactionView,
    TransferHandler,
};

/// Handler for transaction records
pub struct TransactionHandler {
    store: Arc<dyn Store>,
    transfer: TransferHandler,
}

impl TransactionHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            transfer: TransferHandler::new(store.clone()),
            store,
        }
    }

    /// Move the funds and persist the transaction record.
    ///
    /// The transfer engine decides balance sufficiency; this handler only
    /// adds the transaction-kind rules, checked before anything moves.
    pub async fn record(&self, command: RecordTransactionCommand) -> AppResult<Uuid> {
        let (source, destination) = self
            .transfer
            .load_pair(command.source_account_id, command.destination_account_id)
            .await?;

        for account in [&source, &destination] {
            ensure_supports(account, command.kind)?;
        }

        let amount = parse_amount(command.amount)?;
        let mut commit = TransferHandler::apply(source, destination, amount)?;

        let transaction = Transaction::new(
            command.kind,
            amount.value(),
            command.source_account_id,
            command.destination_account_id,
        )?;
        let transaction_id = transaction.id();
        commit.record = Some(transaction);

        self.store.commit_transfer(&commit).await?;

        tracing::info!(
            "Transaction recorded: {} ({} {} from {} to {})",
            transaction_id,
            command.kind,
            amount,
            command.source_account_id,
            command.destination_account_id
        );
        Ok(transaction_id)
    }

    /// Record with its accounts, each `None` once deleted
    pub async fn get(&self, transaction_id: Uuid) -> AppResult<TransactionDetails> {
        tracing::debug!("Loading transaction {}", transaction_id);

        let (transaction, source, destination) = self
            .store
            .get_transaction_with_accounts(transaction_id)
            .await?
            .ok_or(DomainError::TransactionNotFound(transaction_id))?;

        Ok(TransactionDetails {
            transaction: TransactionView::from(&transaction),
            source: source.as_ref().map(AccountView::from),
            destination: destination.as_ref().map(AccountView::from),
        })
    }

    pub async fn list(&self) -> AppResult<Vec<TransactionView>> {
        let transactions = self.store.list_transactions().await?;
        Ok(transactions.iter().map(TransactionView::from).collect())
    }

    /// Remove the record only; balances are not reverted
    pub async fn delete(&self, transaction_id: Uuid) -> AppResult<bool> {
        let deleted = self.store.delete_transaction(transaction_id).await?;

        if deleted {
            tracing::info!("Transaction deleted: {}", transaction_id);
        }
        Ok(deleted)
    }
}

fn ensure_supports(account: &Account, kind: TransactionKind) -> Result<(), DomainError> {
    if account.kind().supports(kind) {
        Ok(())
    } else {
        Err(DomainError::IncompatibleTransactionKind {
            transaction_kind: kind,
            account_kind: account.kind(),
        })
    }
}
