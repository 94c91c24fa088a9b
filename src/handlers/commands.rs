//! Command definitions
//!
//! Commands represent intentions to change the system state. Views are
//! the read shapes handed back to the request-handling layer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{Account, Aggregate, Client, Transaction};
use crate::domain::{AccountKind, AccountStatus, ClientIdentity, TransactionKind};

/// Birth date format used in client views
pub const VIEW_DATE_FORMAT: &str = "%d/%m/%Y";

// =========================================================================
// Client commands
// =========================================================================

/// Command to register a new client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClientCommand {
    pub name: String,
    /// `NNN.NNN.NNN-NN`
    pub national_id: String,
    pub birth_date: NaiveDate,
}

impl RegisterClientCommand {
    pub fn new(name: impl Into<String>, national_id: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            birth_date,
        }
    }
}

/// Command to change a client's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameClientCommand {
    pub client_id: Uuid,
    pub name: String,
}

impl RenameClientCommand {
    pub fn new(client_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            client_id,
            name: name.into(),
        }
    }
}

/// Result of a rename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResult {
    pub client_id: Uuid,
    /// `false` when the new name equals the current one
    pub changed: bool,
}

// =========================================================================
// Account commands
// =========================================================================

/// Command to open an account for an existing client
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpenAccountCommand {
    pub client_id: Uuid,
    pub kind: AccountKind,
}

impl OpenAccountCommand {
    pub fn new(client_id: Uuid, kind: AccountKind) -> Self {
        Self { client_id, kind }
    }
}

/// Command to activate or deactivate an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLifecycleCommand {
    pub account_id: Uuid,
    /// Registration data of the owning client, as claimed by the caller
    pub identity: ClientIdentity,
}

impl AccountLifecycleCommand {
    pub fn new(account_id: Uuid, identity: ClientIdentity) -> Self {
        Self {
            account_id,
            identity,
        }
    }
}

/// Command to deposit into an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepositCommand {
    pub account_id: Uuid,
    pub amount: Decimal,
}

impl DepositCommand {
    pub fn new(account_id: Uuid, amount: Decimal) -> Self {
        Self { account_id, amount }
    }
}

/// Result of a successful deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositResult {
    pub account_id: Uuid,
    /// Amount requested by the depositor
    pub amount: Decimal,
    /// Amount actually credited, surcharge included
    pub credited: Decimal,
    pub balance: Decimal,
}

/// Command to withdraw from an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WithdrawCommand {
    pub account_id: Uuid,
    pub amount: Decimal,
}

impl WithdrawCommand {
    pub fn new(account_id: Uuid, amount: Decimal) -> Self {
        Self { account_id, amount }
    }
}

/// Result of a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawResult {
    pub account_id: Uuid,
    pub amount: Decimal,
    pub balance: Decimal,
}

// =========================================================================
// Transfer commands
// =========================================================================

/// Command to move funds between two accounts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransferCommand {
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount: Decimal,
}

impl TransferCommand {
    pub fn new(source_account_id: Uuid, destination_account_id: Uuid, amount: Decimal) -> Self {
        Self {
            source_account_id,
            destination_account_id,
            amount,
        }
    }
}

/// Result of a successful transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount: Decimal,
    pub source_balance: Decimal,
    pub destination_balance: Decimal,
}

/// Command to move funds and record the movement as a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecordTransactionCommand {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
}

impl RecordTransactionCommand {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        source_account_id: Uuid,
        destination_account_id: Uuid,
    ) -> Self {
        Self {
            kind,
            amount,
            source_account_id,
            destination_account_id,
        }
    }
}

// =========================================================================
// Views
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientView {
    pub id: Uuid,
    pub name: String,
    pub national_id: String,
    /// `DD/MM/YYYY`
    pub birth_date: String,
}

impl From<&Client> for ClientView {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id(),
            name: client.name().to_string(),
            national_id: client.national_id().to_string(),
            birth_date: client.birth_date().format(VIEW_DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub number: i32,
    pub balance: Decimal,
    pub client_id: Uuid,
    pub kind: AccountKind,
    pub status: AccountStatus,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            number: account.number(),
            balance: account.balance().value(),
            client_id: account.client_id(),
            kind: account.kind(),
            status: account.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
}

impl From<&Transaction> for TransactionView {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id(),
            kind: transaction.kind(),
            amount: transaction.amount().value(),
            timestamp: transaction.timestamp(),
            source_account_id: transaction.source_account_id(),
            destination_account_id: transaction.destination_account_id(),
        }
    }
}

/// Client with its accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub client: ClientView,
    pub accounts: Vec<AccountView>,
}

/// Transaction with the accounts it references; either side is `None`
/// once that account has been deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction: TransactionView,
    pub source: Option<AccountView>,
    pub destination: Option<AccountView>,
}
