//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Ledger tables used by the PostgreSQL store tests
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS clients (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        national_id TEXT NOT NULL UNIQUE,
        birth_date DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id UUID PRIMARY KEY,
        account_number INTEGER GENERATED ALWAYS AS IDENTITY UNIQUE,
        balance NUMERIC(18, 2) NOT NULL CHECK (balance >= 0),
        client_id UUID NOT NULL REFERENCES clients (id) ON DELETE CASCADE,
        kind TEXT NOT NULL,
        status TEXT NOT NULL,
        version BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id UUID PRIMARY KEY,
        kind TEXT NOT NULL,
        amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
        created_at TIMESTAMPTZ NOT NULL,
        source_account_id UUID NOT NULL,
        destination_account_id UUID NOT NULL
    )
    "#,
];

/// Connect and make sure the ledger tables exist.
///
/// Tests never truncate: each one works on its own freshly registered
/// clients so they can share the database and run in parallel.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    // Serialise concurrent schema creation from parallel tests
    sqlx::query("SELECT pg_advisory_xact_lock(424242)")
        .execute(&mut *tx)
        .await
        .expect("Failed to take schema lock");

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .expect("Failed to create ledger tables");
    }

    tx.commit().await.expect("Failed to commit schema");

    pool
}

/// A national id no other test run will have used
pub fn unique_national_id() -> String {
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(11)
        .collect();

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
