//! Control-plane handlers
//!
//! Plain-text protocol over the failpoint registry: list, get, count, set,
//! bulk set and deactivate.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use application::ApplicationError;
use domain::DomainError;
use tracing::instrument;

use crate::{
    error::{ApiError, TEXT_PLAIN},
    state::AppState,
};

fn text(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], body)
}

fn decode_body(body: &Bytes) -> Result<&str, ApplicationError> {
    std::str::from_utf8(body)
        .map_err(|_| ApplicationError::Parse(DomainError::invalid_term("body is not valid UTF-8")))
}

/// `GET /`: `name=term` per line, sorted by name
#[instrument(skip(state))]
pub async fn list_all(State(state): State<AppState>) -> impl IntoResponse {
    let body: String = state
        .registry
        .list_all()
        .into_iter()
        .map(|(name, term)| format!("{name}={term}\n"))
        .collect();
    text(body)
}

/// `GET /{name}`: the installed term
#[instrument(skip(state))]
pub async fn get_failpoint(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let term = state.registry.term(&name).map_err(ApiError::Get)?;
    Ok(text(format!("{term}\n")))
}

/// `GET /{name}/count`: hits since the term was installed
#[instrument(skip(state))]
pub async fn get_count(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.registry.count(&name).map_err(ApiError::Count)?;
    Ok(text(count.to_string()))
}

/// `PUT /{name}`: install the term in the body
#[instrument(skip(state, body))]
pub async fn put_failpoint(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    // Unknown names are reported before malformed bodies.
    state.registry.get(&name).map_err(ApiError::Set)?;
    let spec = decode_body(&body).map_err(ApiError::Set)?;
    state.registry.set(&name, spec).map_err(ApiError::Set)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /failpoints`: apply `name=term;...`, reporting the first failure
#[instrument(skip(state, body))]
pub async fn put_failpoints(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let assignments = decode_body(&body).map_err(ApiError::SetMany)?;
    state
        .registry
        .set_from_assignments(assignments)
        .map_err(ApiError::SetMany)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /{name}`: disable the failpoint
#[instrument(skip(state))]
pub async fn delete_failpoint(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .deactivate(&name)
        .map_err(ApiError::Deactivate)?;
    Ok(StatusCode::NO_CONTENT)
}
