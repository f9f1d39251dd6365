//! Server setup and initialization

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use verigate_common::{AppConfig, AppError, AppResult};
use verigate_service::ServiceContext;

use crate::middleware::{apply_middleware, with_rate_limit, with_timeout};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with routes and the standard middleware
pub fn create_app(state: AppState) -> Router {
    apply_middleware(create_router(with_timeout(health_routes()))).with_state(state)
}

/// Build the application as served, rate limiting included
pub fn create_app_with_config(state: AppState, config: &AppConfig) -> AppResult<Router> {
    let health = with_rate_limit(with_timeout(health_routes()), &config.rate_limit)
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(apply_middleware(create_router(health)).with_state(state))
}

/// Serve an application on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> AppResult<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Listener has no local address: {e}")))?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Bind the configured address and serve the webhook endpoints
pub async fn run(config: &AppConfig, service_context: ServiceContext) -> AppResult<()> {
    let addr = config.server.address();
    info!("Starting HTTP server on {addr}");

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let app = create_app_with_config(AppState::new(service_context), config)?;
    run_server(app, listener).await
}
