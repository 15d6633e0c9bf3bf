//! Demo call server handler

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use tracing::instrument;

use crate::{demo::DemoFunction, error::ApiError, state::AppState};

/// Query key carrying positional arguments, repeatable
const ARG_KEY: &str = "arg";

/// `GET /call/{function}?arg=...`: run a demo function and return its result as JSON
///
/// The number of `arg` values must match the function's arity.
#[instrument(skip(state))]
pub async fn call_function(
    State(state): State<AppState>,
    Path(function): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let function: DemoFunction = function.parse().map_err(ApiError::UnknownFunction)?;
    let args = query.iter().filter(|(key, _)| key == ARG_KEY).count();
    if args != function.arity() {
        return Err(ApiError::WrongArity(function.name()));
    }
    Ok(Json(function.call(&state.hook).await))
}
