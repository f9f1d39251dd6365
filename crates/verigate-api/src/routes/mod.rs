//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, webhook};
use crate::state::AppState;

/// Create the router with every endpoint, given the already layered health routes
pub fn create_router(health: Router<AppState>) -> Router<AppState> {
    Router::new().merge(health).merge(webhook_routes())
}

/// Liveness and status
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/_status", get(health::status))
}

/// Form webhooks
fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/form-webhook", post(webhook::form_webhook))
        .route("/form-webhook-fast", post(webhook::form_webhook_fast))
}
