//! Startup diagnostics
//!
//! Logs configuration problems once the bot is connected. Nothing here blocks
//! startup; the bot keeps running with whatever permissions it has.

use tracing::{info, warn};
use verigate_core::{diagnose_role_layout, RoleProblem};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Startup diagnostics
pub struct StartupDiagnostics<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StartupDiagnostics<'a> {
    /// Create a new StartupDiagnostics
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check the role hierarchy and log every problem found
    pub async fn run(&self) -> ServiceResult<Vec<RoleProblem>> {
        if self.ctx.settings().webhook_secret.is_none() {
            warn!("WEBHOOK_SECRET is not set; form webhooks may name any member directly");
        }

        let layout = self.ctx.gateway().role_layout().await?;
        let problems = diagnose_role_layout(&layout, self.ctx.roles());

        if problems.is_empty() {
            info!("Role hierarchy looks good");
        }
        for problem in &problems {
            warn!(%problem, "Role configuration problem");
        }

        Ok(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{context, MemoryGuild, MEMBER};
    use std::sync::Arc;
    use verigate_core::RoleKind;

    #[tokio::test]
    async fn test_flags_role_above_bot() {
        let ctx = context(&Arc::new(MemoryGuild::new()));

        let problems = StartupDiagnostics::new(&ctx).run().await.unwrap();

        assert_eq!(
            problems,
            vec![RoleProblem::RoleNotBelowBot {
                kind: RoleKind::Member,
                id: MEMBER,
                position: 12,
                bot_position: 10,
            }]
        );
    }
}
