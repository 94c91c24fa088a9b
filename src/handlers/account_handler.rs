//! Account Handler
//!
//! Opening, lookup and removal of accounts, plus per-account transaction
//! history.

use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::Account;
use crate::domain::DomainError;
use crate::error::AppResult;
use crate::store::{Store, TransactionDirection};

use super::{load_account, AccountView, OpenAccountCommand, TransactionView};

/// Handler for account operations
pub struct AccountHandler {
    store: Arc<dyn Store>,
}

impl AccountHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Open an inactive, empty account for an existing client.
    /// The store assigns the account number.
    pub async fn open(&self, command: OpenAccountCommand) -> AppResult<Uuid> {
        if self.store.get_client(command.client_id).await?.is_none() {
            return Err(DomainError::OwnerNotFound(command.client_id).into());
        }

        let account = Account::open(command.client_id, command.kind);
        let account_id = self.store.add_account(&account).await?;

        tracing::info!(
            "Account opened: {} ({}) for client {}",
            account_id,
            command.kind,
            command.client_id
        );
        Ok(account_id)
    }

    pub async fn get(&self, account_id: Uuid) -> AppResult<AccountView> {
        tracing::debug!("Loading account {}", account_id);

        let account = load_account(self.store.as_ref(), account_id).await?;
        Ok(AccountView::from(&account))
    }

    /// All accounts, ordered by number
    pub async fn list(&self) -> AppResult<Vec<AccountView>> {
        let accounts = self.store.list_accounts().await?;
        Ok(accounts.iter().map(AccountView::from).collect())
    }

    /// Accounts of one client; empty for an unknown client
    pub async fn list_for_client(&self, client_id: Uuid) -> AppResult<Vec<AccountView>> {
        let accounts = self.store.list_client_accounts(client_id).await?;
        Ok(accounts.iter().map(AccountView::from).collect())
    }

    /// Delete an account. Its transaction records are kept.
    pub async fn delete(&self, account_id: Uuid) -> AppResult<bool> {
        let deleted = self.store.delete_account(account_id).await?;

        if deleted {
            tracing::info!("Account deleted: {}", account_id);
        }
        Ok(deleted)
    }

    /// Transactions the account took part in, filtered by side
    pub async fn transactions(
        &self,
        account_id: Uuid,
        direction: TransactionDirection,
    ) -> AppResult<Vec<TransactionView>> {
        load_account(self.store.as_ref(), account_id).await?;

        let transactions = self
            .store
            .list_account_transactions(account_id, direction)
            .await?;
        Ok(transactions.iter().map(TransactionView::from).collect())
    }
}
