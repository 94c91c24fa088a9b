//! Error handling module
//!
//! Centralized error type returned by every handler, plus the safe
//! rendering the request-handling layer shows to end users.

use crate::domain::{DomainError, ErrorKind};
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Message shown to end users for any internal failure
const INTERNAL_MESSAGE: &str = "Internal error";

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl AppError {
    /// Taxonomy bucket the calling layer maps onto its transport
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(err) => err.kind(),
            AppError::Database(_) | AppError::InvalidData(_) => ErrorKind::Internal,
        }
    }

    /// Domain error carried by this error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Message safe to show to end users.
    ///
    /// Storage detail never leaves the process; it is logged here instead.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Domain(err) => err.to_string(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::InvalidData(msg) => {
                tracing::error!("Invalid stored data: {}", msg);
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            StoreError::InvalidData(msg) => AppError::InvalidData(msg),
            conflict => {
                tracing::warn!("Store rejected write: {}", conflict);
                AppError::Domain(DomainError::PersistenceConflict(conflict.to_string()))
            }
        }
    }
}
