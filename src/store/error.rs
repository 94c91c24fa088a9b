//! Store Errors
//!
//! Error types for persistence operations.

use uuid::Uuid;

/// Errors that can occur in a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict
    #[error("Concurrency conflict for {aggregate_type} {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        aggregate_type: &'static str,
        aggregate_id: Uuid,
        expected: i64,
        actual: i64,
    },

    /// A row the write depends on no longer exists
    #[error("{aggregate_type} not found: {aggregate_id}")]
    Missing {
        aggregate_type: &'static str,
        aggregate_id: Uuid,
    },

    /// Uniqueness constraint violated
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data could not be mapped back onto the domain
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Check if this error is a concurrency conflict
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, StoreError::ConcurrencyConflict { .. })
    }
}

/// Store-wide Result type
pub type StoreResult<T> = Result<T, StoreError>;
