//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod error;
pub mod identity;
pub mod kinds;
pub mod national_id;

pub use amount::{round_money, Amount, AmountError, Balance, MONEY_SCALE};
pub use error::{DomainError, ErrorKind};
pub use identity::{ClientIdentity, IdentityVerifier, RegistrationDataVerifier};
pub use kinds::{AccountKind, AccountStatus, TransactionKind, UnknownKind};
pub use national_id::NationalId;
