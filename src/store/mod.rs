//! Store module
//!
//! Persistence contracts consumed by the handlers, plus the in-memory and
//! PostgreSQL backends.

mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::{Account, Client, Transaction};

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Which side of a transaction an account is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    #[default]
    All,
    AsSource,
    AsDestination,
}

impl TransactionDirection {
    pub fn matches(&self, transaction: &Transaction, account_id: Uuid) -> bool {
        match self {
            TransactionDirection::All => transaction.involves(account_id),
            TransactionDirection::AsSource => transaction.source_account_id() == account_id,
            TransactionDirection::AsDestination => {
                transaction.destination_account_id() == account_id
            }
        }
    }
}

/// Client persistence
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn get_client(&self, id: Uuid) -> StoreResult<Option<Client>>;

    /// Client together with all of its accounts
    async fn get_client_with_accounts(&self, id: Uuid) -> StoreResult<Option<(Client, Vec<Account>)>>;

    async fn list_clients(&self) -> StoreResult<Vec<Client>>;

    /// Fails with `Duplicate` if the national id is already registered
    async fn add_client(&self, client: &Client) -> StoreResult<Uuid>;

    /// Returns `false` if the client does not exist
    async fn update_client(&self, client: &Client) -> StoreResult<bool>;

    /// Deletes the client and its accounts. Returns `false` if absent.
    async fn delete_client(&self, id: Uuid) -> StoreResult<bool>;
}

/// Account persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_account(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Ordered by account number
    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    async fn list_client_accounts(&self, client_id: Uuid) -> StoreResult<Vec<Account>>;

    /// Inserts the account and assigns its sequential number.
    /// Fails with `Missing` if the owning client does not exist.
    async fn add_account(&self, account: &Account) -> StoreResult<Uuid>;

    /// Conditional on `account.version()` matching the stored version.
    /// Returns `false` if the account does not exist.
    async fn update_account(&self, account: &Account) -> StoreResult<bool>;

    async fn delete_account(&self, id: Uuid) -> StoreResult<bool>;
}

/// Transaction record persistence
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>>;

    /// Transaction together with its source and destination accounts,
    /// each absent if the account has since been deleted
    async fn get_transaction_with_accounts(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<(Transaction, Option<Account>, Option<Account>)>>;

    /// Ordered by timestamp
    async fn list_transactions(&self) -> StoreResult<Vec<Transaction>>;

    async fn list_account_transactions(
        &self,
        account_id: Uuid,
        direction: TransactionDirection,
    ) -> StoreResult<Vec<Transaction>>;

    async fn add_transaction(&self, transaction: &Transaction) -> StoreResult<Uuid>;

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<bool>;
}

/// Both sides of a transfer, written as one unit
#[derive(Debug, Clone)]
pub struct TransferCommit {
    pub source: Account,
    pub destination: Account,
    pub record: Option<Transaction>,
}

/// Atomic multi-account writes
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist both account states and the optional record, or nothing.
    /// Each account write is conditional on its loaded version.
    async fn commit_transfer(&self, commit: &TransferCommit) -> StoreResult<()>;
}

/// Everything the handlers need from persistence
pub trait Store: ClientStore + AccountStore + TransactionStore + LedgerStore {}

impl<T> Store for T where T: ClientStore + AccountStore + TransactionStore + LedgerStore {}
