//! Client Aggregate
//!
//! Bank client registration data. Name is the only mutable field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, NationalId};

use super::Aggregate;

/// Client Aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client ID
    id: Uuid,

    /// Full name (non-empty)
    name: String,

    /// National id number, immutable once set
    national_id: NationalId,

    /// Birth date, immutable
    birth_date: NaiveDate,
}

impl Client {
    /// Register a new client, validating name and national id
    pub fn register(
        name: impl Into<String>,
        national_id: &str,
        birth_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(name.into())?;
        let national_id = NationalId::parse(national_id)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            national_id,
            birth_date,
        })
    }

    /// Rebuild a client from stored state
    pub fn from_parts(id: Uuid, name: String, national_id: NationalId, birth_date: NaiveDate) -> Self {
        Self {
            id,
            name,
            national_id,
            birth_date,
        }
    }

    /// Change the client's name.
    ///
    /// Returns `false` when the new name equals the current one.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<bool, DomainError> {
        let name = Self::validate_name(name.into())?;
        if name == self.name {
            return Ok(false);
        }

        self.name = name;
        Ok(true)
    }

    fn validate_name(name: String) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Client name must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn national_id(&self) -> &NationalId {
        &self.national_id
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }
}

impl Aggregate for Client {
    fn aggregate_type() -> &'static str {
        "Client"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
