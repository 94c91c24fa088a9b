//! Transaction Aggregate
//!
//! Immutable record of a completed transfer between two accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Amount, DomainError, TransactionKind};

use super::Aggregate;

/// Transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    kind: TransactionKind,
    amount: Amount,
    /// Stamped at creation (UTC)
    timestamp: DateTime<Utc>,
    source_account_id: Uuid,
    destination_account_id: Uuid,
}

impl Transaction {
    /// Create a new record stamped with the current time.
    ///
    /// Fails with `InvalidAmount` unless `amount > 0`.
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        source_account_id: Uuid,
        destination_account_id: Uuid,
    ) -> Result<Self, DomainError> {
        let amount = Amount::new(amount)?;

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp: Utc::now(),
            source_account_id,
            destination_account_id,
        })
    }

    /// Rebuild a transaction from stored state
    pub fn from_parts(
        id: Uuid,
        kind: TransactionKind,
        amount: Amount,
        timestamp: DateTime<Utc>,
        source_account_id: Uuid,
        destination_account_id: Uuid,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            timestamp,
            source_account_id,
            destination_account_id,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_account_id(&self) -> Uuid {
        self.source_account_id
    }

    pub fn destination_account_id(&self) -> Uuid {
        self.destination_account_id
    }

    /// Whether the given account is on either side of this transaction
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.source_account_id == account_id || self.destination_account_id == account_id
    }
}

impl Aggregate for Transaction {
    fn aggregate_type() -> &'static str {
        "Transaction"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_new() {
        let source = Uuid::new_v4();
        let destination = Uuid::new_v4();
        let before = Utc::now();

        let tx = Transaction::new(TransactionKind::Pix, dec!(100), source, destination).unwrap();

        assert_eq!(tx.kind(), TransactionKind::Pix);
        assert_eq!(tx.amount().value(), dec!(100));
        assert_eq!(tx.source_account_id(), source);
        assert_eq!(tx.destination_account_id(), destination);
        assert!(tx.timestamp() >= before);
        assert!(tx.involves(source) && tx.involves(destination));
        assert!(!tx.involves(Uuid::new_v4()));
    }

    #[test]
    fn test_transaction_non_positive_amount_rejected() {
        for amount in [dec!(0), dec!(-10)] {
            let result =
                Transaction::new(TransactionKind::Ted, amount, Uuid::new_v4(), Uuid::new_v4());
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))), "{amount}");
        }
    }
}
