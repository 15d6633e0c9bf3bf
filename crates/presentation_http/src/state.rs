//! Application state shared across handlers

use std::sync::Arc;

use application::{FailpointRegistry, InjectionHook};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of every failpoint in the process
    pub registry: Arc<FailpointRegistry>,
    /// Hook used by the demo functions
    pub hook: InjectionHook,
}

impl AppState {
    /// Create state around a shared registry
    pub fn new(registry: Arc<FailpointRegistry>) -> Self {
        Self {
            hook: InjectionHook::new(Arc::clone(&registry)),
            registry,
        }
    }
}
