//! failswitch HTTP presentation layer
//!
//! Serves the failpoint control plane and the demo call server on top of a
//! shared [`application::FailpointRegistry`].

pub mod demo;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use demo::{DemoFunction, FAILPOINT_NAMES};
pub use error::ApiError;
pub use middleware::{REQUEST_ID_HEADER, RequestIdLayer};
pub use routes::{create_demo_router, create_router};
pub use state::AppState;
