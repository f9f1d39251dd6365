//! Liveness and status handlers

use axum::{extract::State, Json};
use verigate_service::{StatusResponse, StatusService};

use crate::state::AppState;

/// Liveness check
///
/// GET /
pub async fn root() -> &'static str {
    "OK"
}

/// Connectivity and guild visibility; always 200
///
/// GET /_status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusService::new(state.service_context()).status().await)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_support::test_app;

    #[tokio::test]
    async fn test_root() {
        let (app, _, _) = test_app(None);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_status_reports_disconnected() {
        let (app, ctx, _) = test_app(None);
        ctx.set_connected(false);

        let response = app
            .oneshot(Request::get("/_status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["discord_connected"], false);
        assert_eq!(json["guild_id"], "1");
        assert!(json["timestamp"].is_string());
    }
}
