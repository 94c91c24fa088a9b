//! Account Aggregate
//!
//! Account owns the ledger primitives (`credit` / `debit`) and the
//! activation state machine. Every balance change in the system goes
//! through these two methods.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AccountKind, AccountStatus, Balance, DomainError};

use super::Aggregate;

/// Account Aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID
    id: Uuid,

    /// Sequential account number, assigned by the store on insert (0 until then)
    number: i32,

    /// Current balance, never negative
    balance: Balance,

    /// Owner client ID
    client_id: Uuid,

    kind: AccountKind,

    status: AccountStatus,

    /// Version of the stored row this state was loaded from
    version: i64,
}

impl Account {
    // =========================================================================
    // Account::open()
    // =========================================================================

    /// Open a new account: inactive, zero balance, number not yet assigned
    pub fn open(client_id: Uuid, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: 0,
            balance: Balance::zero(),
            client_id,
            kind,
            status: AccountStatus::Inactive,
            version: 0,
        }
    }

    /// Rebuild an account from stored state
    pub fn from_parts(
        id: Uuid,
        number: i32,
        balance: Balance,
        client_id: Uuid,
        kind: AccountKind,
        status: AccountStatus,
        version: i64,
    ) -> Self {
        Self {
            id,
            number,
            balance,
            client_id,
            kind,
            status,
            version,
        }
    }

    // =========================================================================
    // Ledger primitives
    // =========================================================================

    /// Credit (increase) the balance.
    ///
    /// Fails with `InvalidArgument` for a negative value. No upper bound
    /// beyond decimal overflow.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidArgument(format!(
                "Credit amount must not be negative (got {amount})"
            )));
        }

        self.balance = self
            .balance
            .credit(amount)
            .map_err(|e| DomainError::InvalidArgument(e.to_string()))?;
        Ok(())
    }

    /// Debit (decrease) the balance.
    ///
    /// Fails with `InvalidArgument` for a negative value and with
    /// `InsufficientBalance` when the amount exceeds the balance; the
    /// balance is untouched on failure.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidArgument(format!(
                "Debit amount must not be negative (got {amount})"
            )));
        }

        if !self.balance.is_sufficient_for(amount) {
            return Err(DomainError::insufficient_balance(
                amount,
                self.balance.value(),
            ));
        }

        self.balance = self
            .balance
            .debit(amount)
            .map_err(|e| DomainError::InvalidArgument(e.to_string()))?;
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Inactive -> Active
    pub fn activate(&mut self) -> Result<(), DomainError> {
        if self.status == AccountStatus::Active {
            return Err(DomainError::AlreadyActive);
        }
        self.status = AccountStatus::Active;
        Ok(())
    }

    /// Active -> Inactive
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if self.status == AccountStatus::Inactive {
            return Err(DomainError::AlreadyInactive);
        }
        self.status = AccountStatus::Inactive;
        Ok(())
    }

    /// Fails with `AccountNotActive` unless the account can move money
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::AccountNotActive(self.id))
        }
    }

    // =========================================================================
    // Store hooks
    // =========================================================================

    pub(crate) fn assign_number(&mut self, number: i32) {
        self.number = number;
    }

    pub(crate) fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

impl Aggregate for Account {
    fn aggregate_type() -> &'static str {
        "Account"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn funded(kind: AccountKind, balance: Decimal) -> Account {
        let mut account = Account::open(Uuid::new_v4(), kind);
        account.credit(balance).unwrap();
        account
    }

    #[test]
    fn test_account_open() {
        let client_id = Uuid::new_v4();
        let account = Account::open(client_id, AccountKind::Checking);

        assert_eq!(account.client_id(), client_id);
        assert_eq!(account.kind(), AccountKind::Checking);
        assert_eq!(account.status(), AccountStatus::Inactive);
        assert_eq!(account.balance().value(), Decimal::ZERO);
        assert_eq!(account.number(), 0);
        assert_eq!(account.version(), 0);
    }

    #[test]
    fn test_account_credit() {
        let mut account = Account::open(Uuid::new_v4(), AccountKind::Savings);

        account.credit(dec!(100)).unwrap();
        account.credit(Decimal::ZERO).unwrap();
        assert_eq!(account.balance().value(), dec!(100));
    }

    #[test]
    fn test_account_credit_negative_rejected() {
        let mut account = funded(AccountKind::Checking, dec!(10));

        let result = account.credit(dec!(-1));
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert_eq!(account.balance().value(), dec!(10));
    }

    #[test]
    fn test_account_debit() {
        let mut account = funded(AccountKind::Checking, dec!(100));

        account.debit(dec!(30)).unwrap();
        assert_eq!(account.balance().value(), dec!(70));
    }

    #[test]
    fn test_account_exact_balance_debit() {
        let mut account = funded(AccountKind::Checking, dec!(100));

        account.debit(dec!(100)).unwrap();
        assert_eq!(account.balance().value(), Decimal::ZERO);
    }

    #[test]
    fn test_account_insufficient_balance() {
        let mut account = funded(AccountKind::Checking, dec!(50));

        let result = account.debit(dec!(100));
        assert_eq!(
            result,
            Err(DomainError::insufficient_balance(dec!(100), dec!(50)))
        );
        assert_eq!(account.balance().value(), dec!(50));
    }

    #[test]
    fn test_account_debit_negative_rejected() {
        let mut account = funded(AccountKind::Checking, dec!(50));

        assert!(matches!(
            account.debit(dec!(-5)),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(account.balance().value(), dec!(50));
    }

    #[test]
    fn test_account_activation_cycle() {
        let mut account = Account::open(Uuid::new_v4(), AccountKind::Digital);
        assert!(account.ensure_active().is_err());

        account.activate().unwrap();
        assert!(account.is_active());
        assert_eq!(account.activate(), Err(DomainError::AlreadyActive));

        account.deactivate().unwrap();
        assert_eq!(account.status(), AccountStatus::Inactive);
        assert_eq!(account.deactivate(), Err(DomainError::AlreadyInactive));
    }

    #[test]
    fn test_ledger_does_not_require_active() {
        // Status checks belong to the operations, not the primitives
        let mut account = Account::open(Uuid::new_v4(), AccountKind::Billing);
        account.credit(dec!(5)).unwrap();
        account.debit(dec!(5)).unwrap();
        assert_eq!(account.balance().value(), Decimal::ZERO);
    }
}
