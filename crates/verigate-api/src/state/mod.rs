//! Application state
//!
//! Holds the shared service context. The bot holds a clone of the same context, so
//! the connection flag and invite table seen here are the live ones.

use std::sync::Arc;

use verigate_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext) -> Self {
        Self {
            service_context: Arc::new(service_context),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Owned handle for work that outlives the request
    pub fn shared_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .finish()
    }
}
