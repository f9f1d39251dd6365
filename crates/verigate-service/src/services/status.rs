//! Status service

use tracing::warn;

use crate::dto::StatusResponse;

use super::context::ServiceContext;

/// Reports platform connectivity and guild visibility
pub struct StatusService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatusService<'a> {
    /// Create a new StatusService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Snapshot the current status; never fails
    pub async fn status(&self) -> StatusResponse {
        let presence = self.ctx.gateway().guild_presence().await.map_err(|e| {
            warn!(error = %e, "Guild lookup failed");
            e.to_string()
        });

        StatusResponse::from_presence(
            self.ctx.settings().guild_id,
            self.ctx.is_connected(),
            presence,
        )
    }
}
