//! Client identity check
//!
//! Account activation is gated on the caller proving possession of the
//! owning client's registration data. The check sits behind
//! [`IdentityVerifier`] so a credential-based implementation can replace it
//! without touching the account lifecycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::Client;

use super::DomainError;

/// Birth date formats accepted in a claimed identity
const BIRTH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Registration data presented by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub name: String,
    pub national_id: String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`
    pub birth_date: String,
}

impl ClientIdentity {
    pub fn new(
        name: impl Into<String>,
        national_id: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            birth_date: birth_date.into(),
        }
    }

    /// Build the identity that matches a registered client exactly
    pub fn of(client: &Client) -> Self {
        Self {
            name: client.name().to_string(),
            national_id: client.national_id().to_string(),
            birth_date: client.birth_date().format("%Y-%m-%d").to_string(),
        }
    }

    fn parsed_birth_date(&self) -> Option<NaiveDate> {
        let raw = self.birth_date.trim();
        BIRTH_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }
}

/// Capability deciding whether a caller may act on a client's accounts
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, owner: &Client, claimed: &ClientIdentity) -> Result<(), DomainError>;
}

/// Compares the claimed data field by field with the stored registration data
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationDataVerifier;

impl IdentityVerifier for RegistrationDataVerifier {
    fn verify(&self, owner: &Client, claimed: &ClientIdentity) -> Result<(), DomainError> {
        let matches = claimed.name == owner.name()
            && claimed.national_id == owner.national_id().as_str()
            && claimed.parsed_birth_date() == Some(owner.birth_date());

        if matches {
            Ok(())
        } else {
            Err(DomainError::IdentityMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::register(
            "Maria Souza",
            "987.654.321-11",
            NaiveDate::from_ymd_opt(1995, 5, 10).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_matching_identity() {
        let owner = client();
        let verifier = RegistrationDataVerifier;

        assert!(verifier.verify(&owner, &ClientIdentity::of(&owner)).is_ok());

        let slashed = ClientIdentity::new("Maria Souza", "987.654.321-11", "10/05/1995");
        assert!(verifier.verify(&owner, &slashed).is_ok());
    }

    #[test]
    fn test_any_field_mismatch_rejected() {
        let owner = client();
        let verifier = RegistrationDataVerifier;

        let claims = [
            ClientIdentity::new("Maria", "987.654.321-11", "1995-05-10"),
            ClientIdentity::new("Maria Souza", "111.222.333-44", "1995-05-10"),
            ClientIdentity::new("Maria Souza", "987.654.321-11", "1995-05-11"),
            ClientIdentity::new("Maria Souza", "987.654.321-11", "not a date"),
        ];

        for claim in claims {
            assert_eq!(
                verifier.verify(&owner, &claim),
                Err(DomainError::IdentityMismatch),
                "{claim:?}"
            );
        }
    }
}
