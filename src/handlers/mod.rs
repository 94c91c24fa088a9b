//! Command Handlers module
//!
//! Handlers orchestrate business operations: each one loads aggregates
//! from the store, applies the domain rules and persists the result.

mod account_handler;
mod client_handler;
mod commands;
mod deposit_handler;
mod lifecycle_handler;
mod transaction_handler;
mod transfer_handler;
mod withdraw_handler;


use rust_decimal::Decimal;
use uuid::Uuid;

use crate::aggregate::{Account, Aggregate};
use crate::domain::{Amount, DomainError};
use crate::error::AppResult;
use crate::store::Store;

pub use account_handler::AccountHandler;
pub use client_handler::ClientHandler;
pub use commands::*;
pub use deposit_handler::DepositHandler;
pub use lifecycle_handler::LifecycleHandler;
pub use transaction_handler::TransactionHandler;
pub use transfer_handler::TransferHandler;
pub use withdraw_handler::WithdrawHandler;

/// Load an account or fail with `AccountNotFound`
async fn load_account(store: &dyn Store, account_id: Uuid) -> AppResult<Account> {
    store
        .get_account(account_id)
        .await?
        .ok_or_else(|| DomainError::AccountNotFound(account_id).into())
}

/// Persist a single modified account
async fn save_account(store: &dyn Store, account: &Account) -> AppResult<()> {
    if store.update_account(account).await? {
        Ok(())
    } else {
        Err(DomainError::AccountNotFound(account.id()).into())
    }
}

/// Validate a money amount supplied by the caller
fn parse_amount(amount: Decimal) -> Result<Amount, DomainError> {
    Ok(Amount::new(amount)?)
}
