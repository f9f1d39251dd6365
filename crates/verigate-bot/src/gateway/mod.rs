//! Serenity-backed guild gateway
//!
//! Implements [`GuildGateway`] over the Discord REST API. Every call is scoped to
//! the configured guild and every failure is mapped onto [`GatewayError`].

mod errors;

pub use errors::{classify, from_serenity};

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::{ChannelId, CreateMessage, GuildId, Permissions, RoleId, UserId};
use ::serenity::http::Http;
use tracing::debug;
use verigate_core::{
    GatewayError, GatewayResult, GuildGateway, GuildPresence, InviteUse, RoleLayout, RolePosition,
    Snowflake,
};

/// Reason shown in the guild audit log for role changes
const AUDIT_REASON: &str = "verification flow";

/// Discord implementation of the guild gateway
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityGateway {
    /// Create a gateway for one guild
    pub fn new(http: Arc<Http>, guild_id: Snowflake) -> GatewayResult<Self> {
        Ok(Self {
            http,
            guild_id: GuildId::new(non_zero(guild_id, "guild")?),
        })
    }

    fn http(&self) -> &Http {
        &self.http
    }
}

impl std::fmt::Debug for SerenityGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityGateway")
            .field("guild_id", &self.guild_id)
            .finish_non_exhaustive()
    }
}

/// Serenity ids panic on zero, so refuse it up front
fn non_zero(id: Snowflake, what: &str) -> GatewayResult<u64> {
    if id.is_zero() {
        return Err(GatewayError::not_found(format!("{what} 0")));
    }
    Ok(id.get())
}

fn user(id: Snowflake) -> GatewayResult<UserId> {
    non_zero(id, "user").map(UserId::new)
}

fn role(id: Snowflake) -> GatewayResult<RoleId> {
    non_zero(id, "role").map(RoleId::new)
}

fn channel(id: Snowflake) -> GatewayResult<ChannelId> {
    non_zero(id, "channel").map(ChannelId::new)
}

fn can_manage_roles(permissions: Permissions) -> bool {
    permissions.contains(Permissions::MANAGE_ROLES)
        || permissions.contains(Permissions::ADMINISTRATOR)
}

#[async_trait]
impl GuildGateway for SerenityGateway {
    async fn member_roles(&self, user_id: Snowflake) -> GatewayResult<Vec<Snowflake>> {
        let member = self
            .http()
            .get_member(self.guild_id, user(user_id)?)
            .await
            .map_err(|e| from_serenity(&e))?;

        Ok(member
            .roles
            .iter()
            .map(|r| Snowflake::new(r.get()))
            .collect())
    }

    async fn add_role(&self, user_id: Snowflake, role_id: Snowflake) -> GatewayResult<()> {
        self.http()
            .add_member_role(self.guild_id, user(user_id)?, role(role_id)?, Some(AUDIT_REASON))
            .await
            .map_err(|e| from_serenity(&e))
    }

    async fn remove_role(&self, user_id: Snowflake, role_id: Snowflake) -> GatewayResult<()> {
        self.http()
            .remove_member_role(self.guild_id, user(user_id)?, role(role_id)?, Some(AUDIT_REASON))
            .await
            .map_err(|e| from_serenity(&e))
    }

    async fn send_direct_message(&self, user_id: Snowflake, content: &str) -> GatewayResult<()> {
        user(user_id)?
            .direct_message(self.http(), CreateMessage::new().content(content))
            .await
            .map_err(|e| from_serenity(&e))?;
        Ok(())
    }

    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> GatewayResult<()> {
        channel(channel_id)?
            .say(self.http(), content)
            .await
            .map_err(|e| from_serenity(&e))?;
        Ok(())
    }

    async fn invite_uses(&self) -> GatewayResult<Vec<InviteUse>> {
        let invites = self
            .http()
            .get_guild_invites(self.guild_id)
            .await
            .map_err(|e| from_serenity(&e))?;

        Ok(invites
            .into_iter()
            .map(|invite| InviteUse::new(invite.code, invite.uses))
            .collect())
    }

    async fn guild_presence(&self) -> GatewayResult<GuildPresence> {
        match self.http().get_guild(self.guild_id).await {
            Ok(guild) => Ok(GuildPresence {
                guild_name: Some(guild.name),
                bot_is_member: true,
            }),
            Err(e) => {
                let err = from_serenity(&e);
                // Unknown guild or no access both mean the bot is not in it
                if err.is_not_found() || err.is_authorization() {
                    debug!(error = %err, "Guild not visible to the bot");
                    Ok(GuildPresence {
                        guild_name: None,
                        bot_is_member: false,
                    })
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn role_layout(&self) -> GatewayResult<RoleLayout> {
        let http = self.http();
        let me = http.get_current_user().await.map_err(|e| from_serenity(&e))?;
        let bot = http
            .get_member(self.guild_id, me.id)
            .await
            .map_err(|e| from_serenity(&e))?;
        let roles = http
            .get_guild_roles(self.guild_id)
            .await
            .map_err(|e| from_serenity(&e))?;

        // The @everyone role shares the guild's id and applies to the bot too
        let everyone = RoleId::new(self.guild_id.get());
        let bot_roles: Vec<_> = roles
            .iter()
            .filter(|r| r.id == everyone || bot.roles.contains(&r.id))
            .collect();

        Ok(RoleLayout {
            bot_can_manage_roles: bot_roles.iter().any(|r| can_manage_roles(r.permissions)),
            bot_top_position: bot_roles.iter().map(|r| r.position).max().unwrap_or(0),
            roles: roles
                .iter()
                .map(|r| RolePosition {
                    id: Snowflake::new(r.id.get()),
                    position: r.position,
                })
                .collect(),
        })
    }
}
