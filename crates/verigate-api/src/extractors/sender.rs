//! Webhook sender extractor
//!
//! Checks the shared-secret header so handlers know whether a direct `discord_id`
//! in the body may be honoured.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use verigate_service::VerificationService;

use crate::state::AppState;

/// Header carrying the shared webhook secret
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Whether the caller presented the configured webhook secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookSender {
    pub trusted: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for WebhookSender
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let presented = parts
            .headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());

        let trusted =
            VerificationService::new(app_state.service_context()).is_trusted_sender(presented);

        Ok(Self { trusted })
    }
}
