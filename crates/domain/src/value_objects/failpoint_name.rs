//! Failpoint name value object with validation
//!
//! Names travel inside URL paths (`/{name}`, `/{name}/count`) and inside the
//! bulk assignment syntax (`name=term;name=term`), so the characters those
//! formats use as delimiters are not allowed in a name.
//!
//! # Examples
//!
//! ```
//! use domain::FailpointName;
//!
//! let name = FailpointName::new("ExampleString").unwrap();
//! assert_eq!(name.as_str(), "ExampleString");
//!
//! assert!(FailpointName::new("a/b").is_err());
//! assert!(FailpointName::new("").is_err());
//! ```

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::DomainError;

/// Path segment reserved for the bulk-set endpoint
pub const RESERVED_NAME: &str = "failpoints";

/// A validated failpoint name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Validate)]
#[serde(try_from = "String", into = "String")]
pub struct FailpointName {
    #[validate(length(min = 1, max = 256), custom(function = "validate_charset"))]
    value: String,
}

fn validate_charset(value: &str) -> Result<(), ValidationError> {
    if value == RESERVED_NAME {
        return Err(ValidationError::new("reserved"));
    }
    if value
        .chars()
        .any(|c| c == '/' || c == '=' || c == ';' || c.is_whitespace())
    {
        return Err(ValidationError::new("delimiter"));
    }
    Ok(())
}

impl FailpointName {
    /// Create a new failpoint name, validating length and character set
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, longer than 256 bytes, is the
    /// reserved word `failpoints`, or contains `/`, `=`, `;` or whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let candidate = Self { value: name.into() };
        candidate
            .validate()
            .map_err(|e| DomainError::invalid_name(candidate.value.clone(), e.to_string()))?;
        Ok(candidate)
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for FailpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Borrow<str> for FailpointName {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl AsRef<str> for FailpointName {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<FailpointName> for String {
    fn from(name: FailpointName) -> Self {
        name.value
    }
}

impl TryFrom<String> for FailpointName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FailpointName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["ExampleString", "raft.apply", "wal-fsync", "a_1"] {
            assert!(FailpointName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            FailpointName::new(""),
            Err(DomainError::InvalidName { .. })
        ));
    }

    #[test]
    fn rejects_delimiters() {
        for name in ["a/b", "a=b", "a;b", "a b", "a\tb"] {
            assert!(FailpointName::new(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn rejects_reserved_bulk_route() {
        assert!(FailpointName::new("failpoints").is_err());
        assert!(FailpointName::new("failpoints2").is_ok());
    }

    #[test]
    fn rejects_overlong() {
        let long = "x".repeat(257);
        assert!(FailpointName::new(long).is_err());
        let max = "x".repeat(256);
        assert!(FailpointName::new(max).is_ok());
    }

    #[test]
    fn borrows_as_str_for_map_lookup() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(FailpointName::new("fp").unwrap(), 1);
        assert_eq!(map.get("fp"), Some(&1));
    }

    #[test]
    fn serializes_as_plain_string() {
        let name = FailpointName::new("fp").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"fp\"");
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<FailpointName>("\"fp\"").is_ok());
        assert!(serde_json::from_str::<FailpointName>("\"a/b\"").is_err());
    }
}
