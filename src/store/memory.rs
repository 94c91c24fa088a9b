//! In-memory store
//!
//! Thread-safe map-backed implementation of every store contract, used by
//! tests and local runs where persistence is not required. All writes of a
//! transfer happen inside a single write-lock critical section, after every
//! precondition has been checked.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::aggregate::{Account, Aggregate, Client, Transaction};

use super::{
    AccountStore, ClientStore, LedgerStore, StoreError, StoreResult, TransactionDirection,
    TransactionStore, TransferCommit,
};

#[derive(Debug, Default)]
struct MemoryState {
    clients: HashMap<Uuid, Client>,
    accounts: HashMap<Uuid, Account>,
    transactions: HashMap<Uuid, Transaction>,
    last_account_number: i32,
}

impl MemoryState {
    fn check_account_write(&self, account: &Account) -> StoreResult<()> {
        let stored = self.accounts.get(&account.id()).ok_or(StoreError::Missing {
            aggregate_type: Account::aggregate_type(),
            aggregate_id: account.id(),
        })?;

        if stored.version() != account.version() {
            return Err(StoreError::ConcurrencyConflict {
                aggregate_type: Account::aggregate_type(),
                aggregate_id: account.id(),
                expected: account.version(),
                actual: stored.version(),
            });
        }
        Ok(())
    }

    /// Caller must have run `check_account_write` first
    fn write_account(&mut self, account: &Account) {
        if let Some(stored) = self.accounts.get_mut(&account.id()) {
            let number = stored.number();
            let version = stored.version() + 1;
            *stored = account.clone();
            stored.assign_number(number);
            stored.set_version(version);
        }
    }

    fn sorted_accounts<'a>(&self, accounts: impl Iterator<Item = &'a Account>) -> Vec<Account> {
        let mut accounts: Vec<Account> = accounts.cloned().collect();
        accounts.sort_by_key(Account::number);
        accounts
    }
}

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn get_client(&self, id: Uuid) -> StoreResult<Option<Client>> {
        Ok(self.state.read().await.clients.get(&id).cloned())
    }

    async fn get_client_with_accounts(&self, id: Uuid) -> StoreResult<Option<(Client, Vec<Account>)>> {
        let state = self.state.read().await;
        let Some(client) = state.clients.get(&id) else {
            return Ok(None);
        };

        let accounts = state.sorted_accounts(state.accounts.values().filter(|a| a.client_id() == id));
        Ok(Some((client.clone(), accounts)))
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let state = self.state.read().await;
        let mut clients: Vec<Client> = state.clients.values().cloned().collect();
        clients.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(clients)
    }

    async fn add_client(&self, client: &Client) -> StoreResult<Uuid> {
        let mut state = self.state.write().await;

        if state
            .clients
            .values()
            .any(|c| c.national_id() == client.national_id())
        {
            return Err(StoreError::Duplicate(format!(
                "national id {} is already registered",
                client.national_id()
            )));
        }
        if state.clients.contains_key(&client.id()) {
            return Err(StoreError::Duplicate(format!("client id {}", client.id())));
        }

        state.clients.insert(client.id(), client.clone());
        Ok(client.id())
    }

    async fn update_client(&self, client: &Client) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.clients.get_mut(&client.id()) {
            Some(stored) => {
                *stored = client.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_client(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.clients.remove(&id).is_none() {
            return Ok(false);
        }

        state.accounts.retain(|_, account| account.client_id() != id);
        Ok(true)
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn get_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let state = self.state.read().await;
        Ok(state.sorted_accounts(state.accounts.values()))
    }

    async fn list_client_accounts(&self, client_id: Uuid) -> StoreResult<Vec<Account>> {
        let state = self.state.read().await;
        Ok(state.sorted_accounts(
            state
                .accounts
                .values()
                .filter(|a| a.client_id() == client_id),
        ))
    }

    async fn add_account(&self, account: &Account) -> StoreResult<Uuid> {
        let mut state = self.state.write().await;

        if !state.clients.contains_key(&account.client_id()) {
            return Err(StoreError::Missing {
                aggregate_type: Client::aggregate_type(),
                aggregate_id: account.client_id(),
            });
        }
        if state.accounts.contains_key(&account.id()) {
            return Err(StoreError::Duplicate(format!("account id {}", account.id())));
        }

        state.last_account_number += 1;
        let mut stored = account.clone();
        stored.assign_number(state.last_account_number);
        stored.set_version(1);

        state.accounts.insert(stored.id(), stored);
        Ok(account.id())
    }

    async fn update_account(&self, account: &Account) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&account.id()) {
            return Ok(false);
        }

        state.check_account_write(account)?;
        state.write_account(account);
        Ok(true)
    }

    async fn delete_account(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().await.accounts.remove(&id).is_some())
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>> {
        Ok(self.state.read().await.transactions.get(&id).cloned())
    }

    async fn get_transaction_with_accounts(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<(Transaction, Option<Account>, Option<Account>)>> {
        let state = self.state.read().await;
        Ok(state.transactions.get(&id).map(|tx| {
            let source = state.accounts.get(&tx.source_account_id()).cloned();
            let destination = state.accounts.get(&tx.destination_account_id()).cloned();
            (tx.clone(), source, destination)
        }))
    }

    async fn list_transactions(&self) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state.transactions.values().cloned().collect();
        transactions.sort_by_key(|tx| (tx.timestamp(), tx.id()));
        Ok(transactions)
    }

    async fn list_account_transactions(
        &self,
        account_id: Uuid,
        direction: TransactionDirection,
    ) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|tx| direction.matches(tx, account_id))
            .cloned()
            .collect();
        transactions.sort_by_key(|tx| (tx.timestamp(), tx.id()));
        Ok(transactions)
    }

    async fn add_transaction(&self, transaction: &Transaction) -> StoreResult<Uuid> {
        let mut state = self.state.write().await;
        if state.transactions.contains_key(&transaction.id()) {
            return Err(StoreError::Duplicate(format!(
                "transaction id {}",
                transaction.id()
            )));
        }

        state.transactions.insert(transaction.id(), transaction.clone());
        Ok(transaction.id())
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().await.transactions.remove(&id).is_some())
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn commit_transfer(&self, commit: &TransferCommit) -> StoreResult<()> {
        if commit.source.id() == commit.destination.id() {
            return Err(StoreError::InvalidData(
                "transfer commit references the same account twice".to_string(),
            ));
        }

        let mut state = self.state.write().await;

        // Every check runs before the first write
        state.check_account_write(&commit.source)?;
        state.check_account_write(&commit.destination)?;
        if let Some(record) = &commit.record {
            if state.transactions.contains_key(&record.id()) {
                return Err(StoreError::Duplicate(format!("transaction id {}", record.id())));
            }
        }

        state.write_account(&commit.source);
        state.write_account(&commit.destination);
        if let Some(record) = &commit.record {
            state.transactions.insert(record.id(), record.clone());
        }

        Ok(())
    }
}
