//! Invite service
//!
//! Attributes joins to invite codes by diffing the platform's use counts against
//! the shared table, and routes each join to the matching trigger.

use tracing::{debug, info, instrument, warn};
use verigate_core::{Snowflake, Trigger};

use crate::dto::ReconcileOutcome;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::reconciler::RoleReconciler;

/// Invite service
pub struct InviteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InviteService<'a> {
    /// Create a new InviteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Replace the table with a fresh snapshot; returns the number of codes seen
    #[instrument(skip(self))]
    pub async fn seed(&self) -> ServiceResult<usize> {
        let snapshot = self.ctx.gateway().invite_uses().await?;
        let count = snapshot.len();
        self.ctx.invites().lock().seed(snapshot);
        debug!(count, "Invite uses seeded");
        Ok(count)
    }

    /// Drop a deleted invite from the table
    pub fn forget(&self, code: &str) {
        if self.ctx.invites().lock().forget(code) {
            debug!(code, "Invite forgotten");
        }
    }

    /// Find the invite a join came through.
    ///
    /// A failed fetch leaves the table untouched and yields `None`.
    pub async fn attribute_join(&self) -> Option<String> {
        let snapshot = match self.ctx.gateway().invite_uses().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Could not fetch invites, join left unattributed");
                return None;
            }
        };
        let used = self.ctx.invites().lock().diff(&snapshot);
        debug!(invite = ?used, "Invite diff computed");
        used
    }

    /// Map an attributed code to the join trigger
    pub fn classify_join(&self, used_code: Option<&str>) -> Trigger {
        Trigger::for_join(
            used_code,
            self.ctx.settings().fast_track_invite_code.as_deref(),
        )
    }

    /// Handle a member joining the guild
    #[instrument(skip(self))]
    pub async fn handle_join(&self, member_id: Snowflake) -> ServiceResult<ReconcileOutcome> {
        let used = self.attribute_join().await;
        let trigger = self.classify_join(used.as_deref());
        info!(
            user_id = %member_id,
            invite = used.as_deref().unwrap_or("unknown"),
            trigger = %trigger,
            "Member joined"
        );

        RoleReconciler::new(self.ctx).apply(member_id, trigger).await
    }
}
