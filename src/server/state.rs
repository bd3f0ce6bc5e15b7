//! Application state shared across HTTP handlers

use crate::context::ServiceContext;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// The context is read-only after construction, so a plain Arc is all
/// the sharing needs.
#[derive(Clone)]
pub struct AppState {
    /// Service context with configuration and capability clients
    pub context: Arc<ServiceContext>,
}

impl AppState {
    /// Create a new AppState around a service context
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}
