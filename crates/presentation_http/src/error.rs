//! API error handling
//!
//! Error bodies are plain text of the form `<context>: <cause>\n`. Clients
//! match on these strings, so both wording and status codes are fixed.

use application::ApplicationError;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Content type of every control-plane body
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Reading a single failpoint's term failed
    #[error("failed to GET: {0}")]
    Get(ApplicationError),

    /// Reading a failpoint's hit count failed
    #[error("failed to GET: {0}")]
    Count(ApplicationError),

    /// Setting a single failpoint failed
    #[error("fail to set failpoint: {0}")]
    Set(ApplicationError),

    /// At least one bulk assignment failed
    #[error("fail to set failpoint: {0}")]
    SetMany(ApplicationError),

    /// Deactivating a failpoint failed
    #[error("failed to delete failpoint: {0}")]
    Deactivate(ApplicationError),

    /// The demo server has no function by that name
    #[error("function {0} does not exist")]
    UnknownFunction(String),

    /// The demo function was called with the wrong number of `arg` values
    #[error("wrong number of arguments for function {0}")]
    WrongArity(&'static str),
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Get(_) | Self::Deactivate(_) => StatusCode::NOT_FOUND,
            Self::Count(ApplicationError::NotFound) | Self::Set(ApplicationError::NotFound) => {
                StatusCode::NOT_FOUND
            },
            Self::Count(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Set(_) | Self::SetMany(_) | Self::UnknownFunction(_) | Self::WrongArity(_) => {
                StatusCode::BAD_REQUEST
            },
        }
    }

    /// Plain-text body for this error
    pub fn body(&self) -> String {
        match self {
            // Single-get bodies carry an extra blank line.
            Self::Get(_) => format!("{self}\n\n"),
            _ => format!("{self}\n"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, TEXT_PLAIN)],
            self.body(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use domain::DomainError;

    use super::*;

    fn parse_error() -> ApplicationError {
        ApplicationError::Parse(DomainError::invalid_term("empty term"))
    }

    #[test]
    fn get_errors_are_not_found_with_blank_line() {
        for cause in [ApplicationError::NotFound, ApplicationError::Disabled] {
            let err = ApiError::Get(cause);
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert!(err.body().ends_with("\n\n"));
        }
        assert_eq!(
            ApiError::Get(ApplicationError::Disabled).body(),
            "failed to GET: failpoint: failpoint is disabled\n\n"
        );
    }

    #[test]
    fn count_disabled_is_internal_error() {
        let err = ApiError::Count(ApplicationError::Disabled);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body(), "failed to GET: failpoint: failpoint is disabled\n");

        let err = ApiError::Count(ApplicationError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn set_status_depends_on_cause() {
        assert_eq!(
            ApiError::Set(ApplicationError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        let err = ApiError::Set(parse_error());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            "fail to set failpoint: failpoint: could not parse terms\n"
        );
    }

    #[test]
    fn set_many_is_always_bad_request() {
        assert_eq!(
            ApiError::SetMany(ApplicationError::NotFound).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::SetMany(parse_error()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn deactivate_and_unknown_function_bodies() {
        assert_eq!(
            ApiError::Deactivate(ApplicationError::NotFound).body(),
            "failed to delete failpoint: failpoint: failpoint does not exist\n"
        );
        let err = ApiError::UnknownFunction("Nope".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), "function Nope does not exist\n");

        let err = ApiError::WrongArity("ExampleFunc");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            "wrong number of arguments for function ExampleFunc\n"
        );
    }
}
