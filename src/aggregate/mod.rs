//! Aggregate module
//!
//! Aggregate roots of the ledger: clients, their accounts and the
//! transaction records between accounts.

pub mod account;
pub mod client;
pub mod transaction;

pub use account::Account;
pub use client::Client;
pub use transaction::Transaction;

/// Aggregate trait that all aggregates implement
pub trait Aggregate {
    /// Get the aggregate type name (for storage and logs)
    fn aggregate_type() -> &'static str;

    /// Get the aggregate ID
    fn id(&self) -> uuid::Uuid;

    /// Version used for optimistic concurrency on writes.
    /// Aggregates that are never updated in place report 0.
    fn version(&self) -> i64 {
        0
    }
}
