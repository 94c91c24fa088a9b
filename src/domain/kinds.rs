//! Account and transaction classifications
//!
//! Kinds drive the business rules: deposit surcharge eligibility,
//! withdrawal eligibility and transfer-destination restrictions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    Payroll,
    Billing,
    Digital,
}

impl AccountKind {
    pub const ALL: [AccountKind; 5] = [
        AccountKind::Checking,
        AccountKind::Savings,
        AccountKind::Payroll,
        AccountKind::Billing,
        AccountKind::Digital,
    ];

    /// Storage / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Payroll => "payroll",
            AccountKind::Billing => "billing",
            AccountKind::Digital => "digital",
        }
    }

    /// Funds may only leave to an account of the same owner
    pub fn requires_same_owner_transfer(&self) -> bool {
        matches!(self, AccountKind::Payroll | AccountKind::Savings)
    }

    /// Direct withdrawals are allowed
    pub fn allows_withdrawal(&self) -> bool {
        !matches!(self, AccountKind::Payroll)
    }

    /// Deposits at or above the threshold receive the surcharge
    pub fn has_deposit_surcharge(&self) -> bool {
        matches!(
            self,
            AccountKind::Checking | AccountKind::Digital | AccountKind::Billing
        )
    }

    /// Whether this kind can take part in a transaction of the given kind
    pub fn supports(&self, transaction_kind: TransactionKind) -> bool {
        !(matches!(self, AccountKind::Digital) && transaction_kind.is_paper())
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::Inactive
    }
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// Transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Wire transfer (TED)
    Ted,
    /// Instant payment (PIX)
    Pix,
    /// Billing slip
    Boleto,
    /// Paper cheque
    Cheque,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Ted,
        TransactionKind::Pix,
        TransactionKind::Boleto,
        TransactionKind::Cheque,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Ted => "ted",
            TransactionKind::Pix => "pix",
            TransactionKind::Boleto => "boleto",
            TransactionKind::Cheque => "cheque",
        }
    }

    /// Paper instruments cannot touch digital accounts
    pub fn is_paper(&self) -> bool {
        matches!(self, TransactionKind::Cheque)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Unrecognised enum text (from storage or input)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown kind: {0}")]
pub struct UnknownKind(pub String);
