//! Guild gateway port
//!
//! Everything the bot does to the chat platform goes through this trait: reading a
//! member's live roles, mutating them, sending messages, and listing invites. The
//! platform adapter implements it for real; tests implement it in memory.
//!
//! All calls are scoped to the single community the bot serves.

use async_trait::async_trait;
use serde::Serialize;

use crate::diagnostics::RoleLayout;
use crate::entities::InviteUse;
use crate::error::GatewayResult;
use crate::value_objects::Snowflake;

/// Snapshot used by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildPresence {
    pub guild_name: Option<String>,
    pub bot_is_member: bool,
}

#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// Live role IDs of a member
    async fn member_roles(&self, user_id: Snowflake) -> GatewayResult<Vec<Snowflake>>;

    /// Add a role to a member
    async fn add_role(&self, user_id: Snowflake, role_id: Snowflake) -> GatewayResult<()>;

    /// Remove a role from a member
    async fn remove_role(&self, user_id: Snowflake, role_id: Snowflake) -> GatewayResult<()>;

    /// Send a direct message to a user
    async fn send_direct_message(&self, user_id: Snowflake, content: &str) -> GatewayResult<()>;

    /// Post a message in a guild channel
    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> GatewayResult<()>;

    /// Current use counts of every invite the bot can see
    async fn invite_uses(&self) -> GatewayResult<Vec<InviteUse>>;

    /// Whether the guild is reachable and the bot is in it
    async fn guild_presence(&self) -> GatewayResult<GuildPresence>;

    /// Role positions and the bot's own standing, for permission diagnostics
    async fn role_layout(&self) -> GatewayResult<RoleLayout>;
}
