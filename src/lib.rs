//! bank_ledger Library
//!
//! Clients, accounts and transactions with an atomic transfer engine.
//! Re-exports modules for integration testing and external use.

pub mod aggregate;
pub mod bank;
pub mod domain;
pub mod handlers;
pub mod store;

pub mod config;
pub mod db;
mod error;

pub use bank::Bank;
pub use config::{Config, LedgerConfig};
pub use error::{AppError, AppResult};
pub use domain::{Amount, AmountError, Balance, DomainError, ErrorKind};
