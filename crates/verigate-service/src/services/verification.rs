//! Verification service
//!
//! Issues form links bound to a member and resolves inbound form submissions back
//! to a member ID.
//!
//! A submission may name the member directly through `discord_id`. That path skips
//! token verification entirely, so when a webhook secret is configured it is only
//! honoured for requests that present the secret; everyone else has to carry a
//! valid token.

use serde_json::Value;
use subtle::ConstantTimeEq;
use tracing::{debug, instrument, warn};
use verigate_core::Snowflake;

use crate::dto::FormSubmission;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Verification service
pub struct VerificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VerificationService<'a> {
    /// Create a new VerificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a fresh form link for a member
    pub fn form_link(&self, member_id: Snowflake) -> ServiceResult<String> {
        let token = self.ctx.tokens().issue(member_id)?;
        Ok(self.ctx.settings().form_link(&token))
    }

    /// DM a member a fresh form link
    #[instrument(skip(self))]
    pub async fn send_form_link(&self, member_id: Snowflake) -> ServiceResult<()> {
        let url = self.form_link(member_id)?;
        let hours = self.ctx.tokens().ttl_secs() / 3600;
        let content = format!(
            "Thanks for joining!\n\n\
             🔗 [Click here to fill out the verification form]({url})\n\n\
             The link is valid for {hours} hours. Let us know if you run into any issues!"
        );

        self.ctx
            .gateway()
            .send_direct_message(member_id, &content)
            .await?;
        debug!(user_id = %member_id, "Form link delivered");
        Ok(())
    }

    /// Whether a request presented the configured webhook secret.
    ///
    /// With no secret configured every sender is trusted.
    pub fn is_trusted_sender(&self, presented: Option<&str>) -> bool {
        match (&self.ctx.settings().webhook_secret, presented) {
            (None, _) => true,
            (Some(secret), Some(presented)) => {
                secret.as_bytes().ct_eq(presented.as_bytes()).into()
            }
            (Some(_), None) => false,
        }
    }

    /// Resolve the member a form submission belongs to.
    ///
    /// Prefers the direct `discord_id` field from a trusted sender, then the token.
    /// Returns `None` on any token failure.
    pub fn resolve(&self, body: &Value, trusted_sender: bool) -> Option<Snowflake> {
        let submission = FormSubmission::from_json(body);

        if let Some(member_id) = submission.discord_id {
            if trusted_sender {
                return Some(member_id);
            }
            warn!(user_id = %member_id, "Ignoring discord_id from an unauthenticated sender");
        }

        let token = submission.token?;
        match self.ctx.tokens().verify(&token) {
            Ok(member_id) => Some(member_id),
            Err(e) => {
                warn!(error = %e, "Rejected verification token");
                None
            }
        }
    }
}
