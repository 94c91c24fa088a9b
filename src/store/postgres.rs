//! PostgreSQL store
//!
//! sqlx-backed implementation of the store contracts.
//!
//! Expected tables:
//! - `clients (id, name, national_id UNIQUE, birth_date)`
//! - `accounts (id, account_number IDENTITY, balance NUMERIC(18,2), client_id
//!   REFERENCES clients ON DELETE CASCADE, kind, status, version)`
//! - `transactions (id, kind, amount NUMERIC(18,2), created_at,
//!   source_account_id, destination_account_id)` with no foreign keys, so
//!   records outlive deleted accounts.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::aggregate::{Account, Aggregate, Client, Transaction};
use crate::domain::{AccountKind, AccountStatus, Amount, Balance, NationalId, TransactionKind};

use super::{
    AccountStore, ClientStore, LedgerStore, StoreError, StoreResult, TransactionDirection,
    TransactionStore, TransferCommit,
};

// =========================================================================
// Row types
// =========================================================================

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    national_id: String,
    birth_date: NaiveDate,
}

impl TryFrom<ClientRow> for Client {
    type Error = StoreError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let national_id = NationalId::parse(&row.national_id)
            .map_err(|e| StoreError::InvalidData(format!("client {}: {}", row.id, e)))?;
        Ok(Client::from_parts(row.id, row.name, national_id, row.birth_date))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    account_number: i32,
    balance: Decimal,
    client_id: Uuid,
    kind: String,
    status: String,
    version: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let invalid = |e: &dyn std::fmt::Display| StoreError::InvalidData(format!("account {}: {}", row.id, e));

        let balance = Balance::new(row.balance).map_err(|e| invalid(&e))?;
        let kind = row.kind.parse::<AccountKind>().map_err(|e| invalid(&e))?;
        let status = row.status.parse::<AccountStatus>().map_err(|e| invalid(&e))?;

        Ok(Account::from_parts(
            row.id,
            row.account_number,
            balance,
            row.client_id,
            kind,
            status,
            row.version,
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    kind: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
    source_account_id: Uuid,
    destination_account_id: Uuid,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let invalid = |e: &dyn std::fmt::Display| StoreError::InvalidData(format!("transaction {}: {}", row.id, e));

        let kind = row.kind.parse::<TransactionKind>().map_err(|e| invalid(&e))?;
        let amount = Amount::new(row.amount).map_err(|e| invalid(&e))?;

        Ok(Transaction::from_parts(
            row.id,
            kind,
            amount,
            row.created_at,
            row.source_account_id,
            row.destination_account_id,
        ))
    }
}

const ACCOUNT_COLUMNS: &str = "id, account_number, balance, client_id, kind, status, version";
const TRANSACTION_COLUMNS: &str =
    "id, kind, amount, created_at, source_account_id, destination_account_id";

/// Translate constraint violations into store conflicts
fn map_write_error(err: sqlx::Error, context: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(context.to_string());
        }
    }
    StoreError::Database(err)
}

fn collect<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// =========================================================================
// Conditional account write
// =========================================================================

/// Version-checked update of one account on the given connection.
/// Returns `false` if the account does not exist.
async fn write_account(conn: &mut PgConnection, account: &Account) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET balance = $2, status = $3, version = version + 1
        WHERE id = $1 AND version = $4
        "#,
    )
    .bind(account.id())
    .bind(account.balance().value())
    .bind(account.status().as_str())
    .bind(account.version())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(true);
    }

    let current: Option<i64> = sqlx::query_scalar("SELECT version FROM accounts WHERE id = $1")
        .bind(account.id())
        .fetch_optional(&mut *conn)
        .await?;

    match current {
        None => Ok(false),
        Some(actual) => Err(StoreError::ConcurrencyConflict {
            aggregate_type: Account::aggregate_type(),
            aggregate_id: account.id(),
            expected: account.version(),
            actual,
        }),
    }
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn get_client(&self, id: Uuid) -> StoreResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, name, national_id, birth_date FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Client::try_from).transpose()
    }

    async fn get_client_with_accounts(&self, id: Uuid) -> StoreResult<Option<(Client, Vec<Account>)>> {
        let Some(client) = self.get_client(id).await? else {
            return Ok(None);
        };

        let accounts = self.list_client_accounts(id).await?;
        Ok(Some((client, accounts)))
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let rows: Vec<ClientRow> = sqlx::query_as(
            "SELECT id, name, national_id, birth_date FROM clients ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn add_client(&self, client: &Client) -> StoreResult<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, national_id, birth_date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(client.id())
        .bind(client.name())
        .bind(client.national_id().as_str())
        .bind(client.birth_date())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                &format!("national id {} is already registered", client.national_id()),
            )
        })?;

        tracing::debug!("Inserted client {}", client.id());
        Ok(client.id())
    }

    async fn update_client(&self, client: &Client) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE clients SET name = $2 WHERE id = $1")
            .bind(client.id())
            .bind(client.name())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_client(&self, id: Uuid) -> StoreResult<bool> {
        // accounts.client_id cascades
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn get_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Account::try_from).transpose()
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY account_number"
        ))
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn list_client_accounts(&self, client_id: Uuid) -> StoreResult<Vec<Account>> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE client_id = $1 ORDER BY account_number"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn add_account(&self, account: &Account) -> StoreResult<Uuid> {
        let owner_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clients WHERE id = $1)")
                .bind(account.client_id())
                .fetch_one(&self.pool)
                .await?;

        if !owner_exists {
            return Err(StoreError::Missing {
                aggregate_type: Client::aggregate_type(),
                aggregate_id: account.client_id(),
            });
        }

        // account_number comes from the identity column
        sqlx::query(
            r#"
            INSERT INTO accounts (id, balance, client_id, kind, status, version)
            VALUES ($1, $2, $3, $4, $5, 1)
            "#,
        )
        .bind(account.id())
        .bind(account.balance().value())
        .bind(account.client_id())
        .bind(account.kind().as_str())
        .bind(account.status().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("account id {}", account.id())))?;

        tracing::debug!("Inserted account {}", account.id());
        Ok(account.id())
    }

    async fn update_account(&self, account: &Account) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        write_account(&mut conn, account).await
    }

    async fn delete_account(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn get_transaction_with_accounts(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<(Transaction, Option<Account>, Option<Account>)>> {
        let Some(transaction) = self.get_transaction(id).await? else {
            return Ok(None);
        };

        let source = self.get_account(transaction.source_account_id()).await?;
        let destination = self.get_account(transaction.destination_account_id()).await?;
        Ok(Some((transaction, source, destination)))
    }

    async fn list_transactions(&self) -> StoreResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn list_account_transactions(
        &self,
        account_id: Uuid,
        direction: TransactionDirection,
    ) -> StoreResult<Vec<Transaction>> {
        let filter = match direction {
            TransactionDirection::All => "source_account_id = $1 OR destination_account_id = $1",
            TransactionDirection::AsSource => "source_account_id = $1",
            TransactionDirection::AsDestination => "destination_account_id = $1",
        };

        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE {filter} ORDER BY created_at, id"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn add_transaction(&self, transaction: &Transaction) -> StoreResult<Uuid> {
        let mut conn = self.pool.acquire().await?;
        insert_transaction(&mut conn, transaction).await?;
        Ok(transaction.id())
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

async fn insert_transaction(conn: &mut PgConnection, transaction: &Transaction) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (id, kind, amount, created_at, source_account_id, destination_account_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(transaction.id())
    .bind(transaction.kind().as_str())
    .bind(transaction.amount().value())
    .bind(transaction.timestamp())
    .bind(transaction.source_account_id())
    .bind(transaction.destination_account_id())
    .execute(&mut *conn)
    .await
    .map_err(|e| map_write_error(e, &format!("transaction id {}", transaction.id())))?;

    Ok(())
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn commit_transfer(&self, commit: &TransferCommit) -> StoreResult<()> {
        if commit.source.id() == commit.destination.id() {
            return Err(StoreError::InvalidData(
                "transfer commit references the same account twice".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Row locks are taken in id order so opposing transfers queue
        // behind each other instead of deadlocking
        let mut accounts = [&commit.source, &commit.destination];
        accounts.sort_by_key(|account| account.id());

        // Any early return drops `tx`, which rolls back
        for account in accounts {
            if !write_account(&mut tx, account).await? {
                return Err(StoreError::Missing {
                    aggregate_type: Account::aggregate_type(),
                    aggregate_id: account.id(),
                });
            }
        }

        if let Some(record) = &commit.record {
            insert_transaction(&mut tx, record).await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Committed transfer {} -> {}",
            commit.source.id(),
            commit.destination.id()
        );
        Ok(())
    }
}
