//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// The display text of the runtime variants is part of the control-plane
/// wire format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// No failpoint is registered under the name
    #[error("failpoint: failpoint does not exist")]
    NotFound,

    /// The failpoint exists but has no term installed
    #[error("failpoint: failpoint is disabled")]
    Disabled,

    /// A term specification was rejected by the parser
    #[error("failpoint: could not parse terms")]
    Parse(#[source] DomainError),

    /// A bulk entry had no `=` between name and term
    #[error("failpoint: malformed assignment {0:?}")]
    MalformedAssignment(String),

    /// A compiled-in failpoint name failed validation
    #[error("failpoint: invalid registration: {0}")]
    Registration(#[source] DomainError),

    /// The same name was registered twice
    #[error("failpoint: duplicate registration of {0:?}")]
    DuplicateName(String),
}

impl ApplicationError {
    /// Whether the error means the name is unknown
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Whether the error came from client input rather than registry state
    #[must_use]
    pub const fn is_bad_input(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::MalformedAssignment(_))
    }
}
