//! Route definitions

use axum::{
    Router,
    routing::{get, put},
};

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the control-plane router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::failpoints::list_all))
        // Static segment wins over `/{name}`
        .route("/failpoints", put(handlers::failpoints::put_failpoints))
        .route(
            "/{name}",
            get(handlers::failpoints::get_failpoint)
                .put(handlers::failpoints::put_failpoint)
                .delete(handlers::failpoints::delete_failpoint),
        )
        .route("/{name}/count", get(handlers::failpoints::get_count))
        .layer(RequestIdLayer::new())
        .with_state(state)
}

/// Create the demo call server router
pub fn create_demo_router(state: AppState) -> Router {
    Router::new()
        .route("/call/{function}", get(handlers::demo::call_function))
        .layer(RequestIdLayer::new())
        .with_state(state)
}
