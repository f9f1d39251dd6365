//! Role reconciler
//!
//! The only component that mutates roles. Each call reads the member's live role
//! set, plans the minimal change for the trigger, and applies it. A role the
//! platform no longer knows is treated as already gone. Any other failure, a member
//! who left included, abandons the remaining steps for this trigger and is returned
//! to the caller to log.

use tracing::{debug, info, instrument, warn};
use verigate_core::{plan, GatewayError, RoleKind, Snowflake, Trigger};

use crate::dto::responses::{CycleAction, CycleStep};
use crate::dto::{ReconcileOutcome, RoleCycle};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::verification::VerificationService;

/// Role reconciler
pub struct RoleReconciler<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleReconciler<'a> {
    /// Create a new RoleReconciler
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a trigger to a member
    #[instrument(skip(self), fields(trigger = %trigger))]
    pub async fn apply(
        &self,
        member_id: Snowflake,
        trigger: Trigger,
    ) -> ServiceResult<ReconcileOutcome> {
        let current = self.ctx.gateway().member_roles(member_id).await?;
        let plan = plan(trigger, &current, self.ctx.roles());
        let mut outcome = ReconcileOutcome::new(member_id, trigger);

        for kind in &plan.remove {
            if self.mutate(member_id, *kind, CycleAction::Remove).await? {
                outcome.removed.push(*kind);
            }
        }
        for kind in &plan.add {
            if self.mutate(member_id, *kind, CycleAction::Add).await? {
                outcome.added.push(*kind);
            }
        }

        if outcome.is_noop() {
            debug!(user_id = %member_id, "Roles already reconciled");
        } else {
            info!(
                user_id = %member_id,
                added = ?outcome.added,
                removed = ?outcome.removed,
                "Roles reconciled"
            );
        }

        if trigger.sends_form_link() {
            let delivered = match VerificationService::new(self.ctx)
                .send_form_link(member_id)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    warn!(user_id = %member_id, error = %e, "Could not deliver form link");
                    false
                }
            };
            outcome.link_delivered = Some(delivered);
        }

        if plan.audit && outcome.added.contains(&RoleKind::Member) {
            outcome.audited = self.audit_promotion(member_id).await;
        }

        Ok(outcome)
    }

    /// Cycle each managed role on a member to surface permission problems
    #[instrument(skip(self))]
    pub async fn debug_cycle(&self, member_id: Snowflake) -> ServiceResult<Vec<RoleCycle>> {
        let current = self.ctx.gateway().member_roles(member_id).await?;
        let mut cycles = Vec::with_capacity(RoleKind::ALL.len());

        for kind in RoleKind::ALL {
            let role_id = self.ctx.roles().get(kind);
            let held = current.contains(&role_id);
            let sequence = if held {
                [CycleAction::Remove, CycleAction::Add]
            } else {
                [CycleAction::Add, CycleAction::Remove]
            };

            let mut steps = Vec::with_capacity(2);
            for action in sequence {
                let result = match action {
                    CycleAction::Add => self.ctx.gateway().add_role(member_id, role_id).await,
                    CycleAction::Remove => {
                        self.ctx.gateway().remove_role(member_id, role_id).await
                    }
                };
                let failed = result.is_err();
                if let Err(e) = &result {
                    warn!(user_id = %member_id, role = %kind, error = %e, "Role debug step failed");
                }
                steps.push(CycleStep {
                    action,
                    error: result.err().map(|e| e.to_string()),
                });
                // Leave the member as they were if the first step did not take
                if failed {
                    break;
                }
            }

            cycles.push(RoleCycle {
                role: kind,
                role_id,
                held,
                steps,
            });
        }

        Ok(cycles)
    }

    /// Apply one mutation; `Ok(false)` when the role no longer exists
    async fn mutate(
        &self,
        member_id: Snowflake,
        kind: RoleKind,
        action: CycleAction,
    ) -> ServiceResult<bool> {
        let role_id = self.ctx.roles().get(kind);
        let result = match action {
            CycleAction::Add => self.ctx.gateway().add_role(member_id, role_id).await,
            CycleAction::Remove => self.ctx.gateway().remove_role(member_id, role_id).await,
        };

        match result {
            Ok(()) => Ok(true),
            Err(GatewayError::NotFound(what)) => {
                debug!(user_id = %member_id, role = %kind, %what, "Skipping mutation, role missing");
                Ok(false)
            }
            Err(e @ GatewayError::UnknownMember(_)) => {
                warn!(user_id = %member_id, role = %kind, "Member left before the role change");
                Err(e.into())
            }
            Err(e) => {
                if e.is_authorization() {
                    warn!(
                        user_id = %member_id,
                        role = %kind,
                        role_id = %role_id,
                        "Bot is not allowed to manage this role; check Manage Roles and the role order"
                    );
                }
                Err(e.into())
            }
        }
    }

    async fn audit_promotion(&self, member_id: Snowflake) -> bool {
        let Some(channel_id) = self.ctx.settings().log_channel_id else {
            return false;
        };
        let content =
            format!("✅ <@{member_id}> posted an introduction and was given the Member role.");

        match self
            .ctx
            .gateway()
            .send_channel_message(channel_id, &content)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Failed to post audit message");
                false
            }
        }
    }
}
