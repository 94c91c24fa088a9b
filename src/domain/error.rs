//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::{AccountKind, AmountError, TransactionKind};

/// Error categories exposed to the request-handling layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InvalidOperation,
    InsufficientBalance,
    PersistenceConflict,
    Internal,
}

/// Domain-specific errors
///
/// These errors represent business rule violations and domain invariant failures.
/// They are independent of the storage layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Zero, negative or badly scaled amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid national id: {0}")]
    InvalidNationalId(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Either side of a transfer could not be resolved
    #[error("Source or destination account not found")]
    AccountsNotFound,

    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,

    #[error("Account is not active: {0}")]
    AccountNotActive(Uuid),

    #[error("Account is already active")]
    AlreadyActive,

    #[error("Account is already inactive")]
    AlreadyInactive,

    /// Claimed identity did not match the owning client's registration data
    #[error("Client data mismatch")]
    IdentityMismatch,

    #[error("{kind} accounts can only transfer to accounts of the same client")]
    SameOwnerRequired { kind: AccountKind },

    #[error("Withdrawals are not allowed from {kind} accounts")]
    WithdrawalNotAllowed { kind: AccountKind },

    #[error("Transaction kind {transaction_kind} is not allowed for {account_kind} accounts")]
    IncompatibleTransactionKind {
        transaction_kind: TransactionKind,
        account_kind: AccountKind,
    },

    #[error("Cannot open an account for a client that does not exist: {0}")]
    OwnerNotFound(Uuid),

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    /// The store rejected the write (stale version, uniqueness violation).
    /// The detail is for logs only and is left out of the message.
    #[error("Persistence conflict: the data was changed or already exists")]
    PersistenceConflict(String),
}

impl DomainError {
    /// Create an insufficient balance error
    pub fn insufficient_balance(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientNotFound(_) | Self::AccountNotFound(_) | Self::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidAmount(_) | Self::InvalidNationalId(_) | Self::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
            Self::AccountsNotFound
            | Self::SameAccountTransfer
            | Self::AccountNotActive(_)
            | Self::AlreadyActive
            | Self::AlreadyInactive
            | Self::IdentityMismatch
            | Self::SameOwnerRequired { .. }
            | Self::WithdrawalNotAllowed { .. }
            | Self::IncompatibleTransactionKind { .. }
            | Self::OwnerNotFound(_) => ErrorKind::InvalidOperation,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::PersistenceConflict(_) => ErrorKind::PersistenceConflict,
        }
    }

    /// Check if this is a business rule violation
    pub fn is_business_rule_violation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidOperation | ErrorKind::InsufficientBalance
        )
    }

    /// Check if this is a conflict error (retry by the caller may help)
    pub fn is_conflict_error(&self) -> bool {
        matches!(self, Self::PersistenceConflict(_))
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        DomainError::InvalidAmount(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_balance_error() {
        let err = DomainError::insufficient_balance(dec!(1000), dec!(50));

        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        assert!(err.is_business_rule_violation());
        assert!(!err.is_conflict_error());
        assert!(err.to_string().contains("1000"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_rule_violations_are_invalid_operations() {
        let errors = [
            DomainError::SameAccountTransfer,
            DomainError::AccountsNotFound,
            DomainError::IdentityMismatch,
            DomainError::SameOwnerRequired {
                kind: AccountKind::Payroll,
            },
            DomainError::WithdrawalNotAllowed {
                kind: AccountKind::Payroll,
            },
        ];

        for err in errors {
            assert_eq!(err.kind(), ErrorKind::InvalidOperation, "{err}");
        }
    }

    #[test]
    fn test_same_owner_message_names_rule() {
        let err = DomainError::SameOwnerRequired {
            kind: AccountKind::Savings,
        };
        assert_eq!(
            err.to_string(),
            "savings accounts can only transfer to accounts of the same client"
        );
    }

    #[test]
    fn test_amount_error_is_invalid_argument() {
        let err: DomainError = AmountError::NotPositive(dec!(0)).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_persistence_conflict() {
        let err = DomainError::PersistenceConflict("stale account version".to_string());
        assert!(err.is_conflict_error());
        assert_eq!(err.kind(), ErrorKind::PersistenceConflict);
        assert!(!err.to_string().contains("stale"));
    }
}
