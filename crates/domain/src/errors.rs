//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A term specification could not be parsed
    #[error("Invalid term: {reason}")]
    InvalidTerm { reason: String },

    /// A duration literal could not be parsed
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// A failpoint name failed validation
    #[error("Invalid failpoint name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

impl DomainError {
    /// Create an invalid term error
    pub fn invalid_term(reason: impl Into<String>) -> Self {
        Self::InvalidTerm {
            reason: reason.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
