//! In-memory guild for tests
//!
//! Built for this crate's unit tests and exported behind the `test_utils`
//! feature for the HTTP handler and end-to-end tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use verigate_common::VerificationTokens;
use verigate_core::{
    GatewayError, GatewayResult, GuildGateway, GuildPresence, InviteUse, RoleIds, RoleLayout,
    RolePosition, Snowflake,
};

use crate::services::{FlowSettings, ServiceContext};

pub const UNVERIFIED: Snowflake = Snowflake::new(10);
pub const VERIFIED: Snowflake = Snowflake::new(20);
pub const MEMBER: Snowflake = Snowflake::new(30);
pub const INTRO_CHANNEL: Snowflake = Snowflake::new(500);
pub const LOG_CHANNEL: Snowflake = Snowflake::new(600);
pub const FAST_TRACK_CODE: &str = "fast";
pub const SECRET: &str = "service-test-secret";

pub fn settings() -> FlowSettings {
    FlowSettings {
        guild_id: Snowflake::new(1),
        roles: RoleIds {
            unverified: UNVERIFIED,
            verified: VERIFIED,
            member: MEMBER,
        },
        fast_track_invite_code: Some(FAST_TRACK_CODE.to_string()),
        intro_channel_id: Some(INTRO_CHANNEL),
        log_channel_id: Some(LOG_CHANNEL),
        verify_message_id: None,
        verify_emoji: "✅".to_string(),
        form_url: "https://forms.example/r/abc".to_string(),
        webhook_secret: None,
    }
}

pub fn context(guild: &Arc<MemoryGuild>) -> ServiceContext {
    context_with(guild, settings())
}

pub fn context_with(guild: &Arc<MemoryGuild>, settings: FlowSettings) -> ServiceContext {
    ServiceContext::new(
        guild.clone(),
        Arc::new(VerificationTokens::new(SECRET, 86400)),
        settings,
    )
}

#[derive(Default)]
pub struct MemoryGuild {
    members: Mutex<HashMap<Snowflake, Vec<Snowflake>>>,
    closed_dms: Mutex<HashSet<Snowflake>>,
    forbidden_roles: Mutex<HashSet<Snowflake>>,
    deleted_roles: Mutex<HashSet<Snowflake>>,
    departing: Mutex<HashSet<Snowflake>>,
    bot_left: Mutex<bool>,
    invites: Mutex<Option<Vec<InviteUse>>>,
    dms: Mutex<Vec<(Snowflake, String)>>,
    channel_messages: Mutex<Vec<(Snowflake, String)>>,
    mutations: Mutex<usize>,
}

impl MemoryGuild {
    pub fn new() -> Self {
        Self {
            invites: Mutex::new(Some(Vec::new())),
            ..Self::default()
        }
    }

    pub fn with_member(self, id: Snowflake, roles: &[Snowflake]) -> Self {
        self.add_member(id, roles);
        self
    }

    pub fn add_member(&self, id: Snowflake, roles: &[Snowflake]) {
        self.members.lock().insert(id, roles.to_vec());
    }

    pub fn roles_of(&self, id: Snowflake) -> Vec<Snowflake> {
        self.members.lock().get(&id).cloned().unwrap_or_default()
    }

    /// Make the guild invisible to the bot
    pub fn leave(&self) {
        *self.bot_left.lock() = true;
    }

    /// The member leaves right after their roles are next read
    pub fn leave_after_lookup(&self, id: Snowflake) {
        self.departing.lock().insert(id);
    }

    pub fn close_dms(&self, id: Snowflake) {
        self.closed_dms.lock().insert(id);
    }

    pub fn forbid_role(&self, role: Snowflake) {
        self.forbidden_roles.lock().insert(role);
    }

    pub fn delete_role(&self, role: Snowflake) {
        self.deleted_roles.lock().insert(role);
    }

    /// `None` makes the invite fetch fail
    pub fn set_invites(&self, invites: Option<Vec<InviteUse>>) {
        *self.invites.lock() = invites;
    }

    pub fn dms_to(&self, id: Snowflake) -> Vec<String> {
        self.dms
            .lock()
            .iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, content)| content.clone())
            .collect()
    }

    pub fn channel_messages(&self, channel: Snowflake) -> Vec<String> {
        self.channel_messages
            .lock()
            .iter()
            .filter(|(to, _)| *to == channel)
            .map(|(_, content)| content.clone())
            .collect()
    }

    pub fn mutations(&self) -> usize {
        *self.mutations.lock()
    }

    fn check_role(&self, role_id: Snowflake) -> GatewayResult<()> {
        if self.deleted_roles.lock().contains(&role_id) {
            return Err(GatewayError::not_found(format!("role {role_id}")));
        }
        if self.forbidden_roles.lock().contains(&role_id) {
            return Err(GatewayError::forbidden("Missing Permissions"));
        }
        Ok(())
    }
}

#[async_trait]
impl GuildGateway for MemoryGuild {
    async fn member_roles(&self, user_id: Snowflake) -> GatewayResult<Vec<Snowflake>> {
        let mut members = self.members.lock();
        let roles = members
            .get(&user_id)
            .cloned()
            .ok_or_else(|| GatewayError::unknown_member(user_id.to_string()))?;
        if self.departing.lock().remove(&user_id) {
            members.remove(&user_id);
        }
        Ok(roles)
    }

    async fn add_role(&self, user_id: Snowflake, role_id: Snowflake) -> GatewayResult<()> {
        self.check_role(role_id)?;
        let mut members = self.members.lock();
        let roles = members
            .get_mut(&user_id)
            .ok_or_else(|| GatewayError::unknown_member(user_id.to_string()))?;
        if !roles.contains(&role_id) {
            roles.push(role_id);
        }
        *self.mutations.lock() += 1;
        Ok(())
    }

    async fn remove_role(&self, user_id: Snowflake, role_id: Snowflake) -> GatewayResult<()> {
        self.check_role(role_id)?;
        let mut members = self.members.lock();
        let roles = members
            .get_mut(&user_id)
            .ok_or_else(|| GatewayError::unknown_member(user_id.to_string()))?;
        roles.retain(|r| *r != role_id);
        *self.mutations.lock() += 1;
        Ok(())
    }

    async fn send_direct_message(&self, user_id: Snowflake, content: &str) -> GatewayResult<()> {
        if self.closed_dms.lock().contains(&user_id) {
            return Err(GatewayError::DirectMessagesClosed);
        }
        self.dms.lock().push((user_id, content.to_string()));
        Ok(())
    }

    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> GatewayResult<()> {
        self.channel_messages
            .lock()
            .push((channel_id, content.to_string()));
        Ok(())
    }

    async fn invite_uses(&self) -> GatewayResult<Vec<InviteUse>> {
        self.invites
            .lock()
            .clone()
            .ok_or_else(|| GatewayError::transient("invite fetch failed"))
    }

    async fn guild_presence(&self) -> GatewayResult<GuildPresence> {
        let present = !*self.bot_left.lock();
        Ok(GuildPresence {
            guild_name: present.then(|| "Test Guild".to_string()),
            bot_is_member: present,
        })
    }

    async fn role_layout(&self) -> GatewayResult<RoleLayout> {
        Ok(RoleLayout {
            bot_can_manage_roles: true,
            bot_top_position: 10,
            roles: vec![
                RolePosition {
                    id: UNVERIFIED,
                    position: 1,
                },
                RolePosition {
                    id: VERIFIED,
                    position: 2,
                },
                RolePosition {
                    id: MEMBER,
                    position: 12,
                },
            ],
        })
    }
}
