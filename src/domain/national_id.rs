//! National id number
//!
//! Fixed-format registration number `NNN.NNN.NNN-NN`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

const FORMAT_LEN: usize = 14;

/// Validated national id number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Parse a national id, requiring the exact grouped format.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if !Self::is_well_formed(value) {
            return Err(DomainError::InvalidNationalId(format!(
                "expected NNN.NNN.NNN-NN, got '{value}'"
            )));
        }
        Ok(Self(value.to_string()))
    }

    fn is_well_formed(value: &str) -> bool {
        let bytes = value.as_bytes();
        if bytes.len() != FORMAT_LEN {
            return false;
        }

        bytes.iter().enumerate().all(|(idx, b)| match idx {
            3 | 7 => *b == b'.',
            11 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NationalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NationalId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_national_id() {
        let id = NationalId::parse("123.456.789-00").unwrap();
        assert_eq!(id.as_str(), "123.456.789-00");
    }

    #[test]
    fn test_malformed_national_ids() {
        let invalid = [
            "",
            "12345678900",
            "123.456.789.00",
            "123-456-789.00",
            "123.456.78-900",
            "abc.def.ghi-jk",
            "123.456.789-000",
            "123.456.789-0",
            " 123.456.789-00",
        ];

        for value in invalid {
            assert!(
                matches!(NationalId::parse(value), Err(DomainError::InvalidNationalId(_))),
                "Expected error for national id: {value:?}"
            );
        }
    }

    #[test]
    fn test_national_id_deserialize_validates() {
        let ok: NationalId = serde_json::from_str(r#""987.654.321-11""#).unwrap();
        assert_eq!(ok.to_string(), "987.654.321-11");
        assert!(serde_json::from_str::<NationalId>(r#""98765432111""#).is_err());
    }
}
