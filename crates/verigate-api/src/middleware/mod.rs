//! Middleware stack for the HTTP server
//!
//! Every route gets a request ID and a trace span. The timeout and the global
//! rate limit only guard the health routes: a form webhook must answer 200 or
//! 400, and cutting the synchronous one short would stop it between role changes.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::HeaderName, Request, StatusCode},
    Router,
};
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use verigate_common::RateLimitConfig;

use crate::response::ApiError;
use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Timeout for a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the request ID and trace layers
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(REQUEST_ID_HEADER),
                MakeRequestUuid,
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");

                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    })
                    .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            ),
    )
}

/// Bound request time, 503 on timeout
pub fn with_timeout(router: Router<AppState>) -> Router<AppState> {
    router.layer(TimeoutLayer::with_status_code(
        StatusCode::SERVICE_UNAVAILABLE,
        REQUEST_TIMEOUT,
    ))
}

/// Apply a global rate limit
pub fn with_rate_limit(
    router: Router<AppState>,
    rate_limit: &RateLimitConfig,
) -> Result<Router<AppState>, ApiError> {
    // Global key: the webhook senders are a handful of form providers, not end users
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(rate_limit.requests_per_second.into())
            .burst_size(rate_limit.burst)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .ok_or_else(|| {
                ApiError::internal(anyhow::anyhow!(
                    "Invalid rate limit configuration: {} rps, burst {}",
                    rate_limit.requests_per_second,
                    rate_limit.burst
                ))
            })?,
    );

    Ok(router.layer(GovernorLayer {
        config: governor_conf,
    }))
}
