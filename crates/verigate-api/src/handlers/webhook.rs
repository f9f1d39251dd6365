//! Form webhook handlers
//!
//! Both endpoints take the same payload. The synchronous one answers after the
//! reconciler has run; the fast one answers at once and does the work on a
//! background task so slow platform calls never trip the sender's timeout.
//! Reconciler failures are logged and never surface to the sender, which would
//! otherwise retry.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::{info, warn};
use verigate_core::{Snowflake, Trigger};
use verigate_service::{RoleReconciler, ServiceContext, VerificationService};

use crate::extractors::WebhookSender;
use crate::response::{ApiError, ApiResult, WebhookAck};
use crate::state::AppState;

/// Synchronous form webhook
///
/// POST /form-webhook
pub async fn form_webhook(
    State(state): State<AppState>,
    sender: WebhookSender,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let ctx = state.service_context();
    let member_id = resolve_member(ctx, &body, sender.trusted)?;

    reconcile(ctx, member_id).await;

    Ok(Json(WebhookAck::processed(member_id)))
}

/// Fire-and-forget form webhook
///
/// POST /form-webhook-fast
pub async fn form_webhook_fast(
    State(state): State<AppState>,
    sender: WebhookSender,
    body: Bytes,
) -> Json<WebhookAck> {
    let ctx = state.shared_context();

    tokio::spawn(async move {
        match resolve_member(&ctx, &body, sender.trusted) {
            Ok(member_id) => reconcile(&ctx, member_id).await,
            Err(e) => warn!(error = %e, "Dropping form submission"),
        }
    });

    Json(WebhookAck::accepted())
}

fn resolve_member(ctx: &ServiceContext, body: &[u8], trusted: bool) -> ApiResult<Snowflake> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::no_identifier("Request body is not valid JSON"))?;

    VerificationService::new(ctx)
        .resolve(&payload, trusted)
        .ok_or_else(|| ApiError::no_identifier("No discord_id or valid token in submission"))
}

async fn reconcile(ctx: &ServiceContext, member_id: Snowflake) {
    match RoleReconciler::new(ctx)
        .apply(member_id, Trigger::FormSubmitted)
        .await
    {
        Ok(outcome) => info!(
            user_id = %member_id,
            added = ?outcome.added,
            removed = ?outcome.removed,
            "Form submission processed"
        ),
        Err(e) => warn!(
            user_id = %member_id,
            code = e.error_code(),
            error = %e,
            "Form submission not applied"
        ),
    }
}
