//! Response types and error handling for API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use verigate_common::ErrorResponse;
use verigate_core::Snowflake;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// Neither a trusted `discord_id` nor a valid token was found
    #[error("{0}")]
    NoIdentifier(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::NoIdentifier(_) => "NO_IDENTIFIER",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn no_identifier(msg: impl Into<String>) -> Self {
        Self::NoIdentifier(msg.into())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        } else {
            warn!(code = self.error_code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse::new(self.error_code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Acknowledgement returned by the webhook endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    /// `processed` once the reconciler ran, `accepted` when queued
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Snowflake>,
}

impl WebhookAck {
    pub fn processed(member_id: Snowflake) -> Self {
        Self {
            status: "processed",
            member_id: Some(member_id),
        }
    }

    pub fn accepted() -> Self {
        Self {
            status: "accepted",
            member_id: None,
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
