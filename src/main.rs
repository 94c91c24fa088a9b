//! bank_ledger - ledger bootstrap
//!
//! Loads configuration, connects to PostgreSQL, verifies the ledger schema
//! and reports its contents. The ledger itself is driven through
//! [`bank_ledger::Bank`] by a request-handling layer.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bank_ledger::store::PgStore;
use bank_ledger::{db, Bank, Config};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bank_ledger=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting bank_ledger ({})", config.environment);
    tracing::info!(
        "Deposit surcharge: {} from {}",
        config.ledger.deposit_surcharge_rate,
        config.ledger.deposit_surcharge_threshold
    );
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::verify_connection(&pool).await?;

    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    for (table, count) in db::table_counts(&pool).await? {
        tracing::info!("{}: {} rows", table, count);
    }

    let bank = Bank::new(Arc::new(PgStore::new(pool.clone())), config.ledger);
    let clients = bank.list_clients().await.map_err(|e| anyhow::anyhow!(e.public_message()))?;
    tracing::info!("Ledger ready with {} clients", clients.len());

    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}
