//! Service context - dependency container for services
//!
//! Holds the platform gateway, the token service, the invite-use table, and the
//! flow settings derived from configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use verigate_common::{AppConfig, VerificationTokens};
use verigate_core::{GuildGateway, InviteUseTracker, RoleIds, Snowflake};

/// Settings that shape the verification flow
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub guild_id: Snowflake,
    pub roles: RoleIds,
    pub fast_track_invite_code: Option<String>,
    pub intro_channel_id: Option<Snowflake>,
    pub log_channel_id: Option<Snowflake>,
    pub verify_message_id: Option<Snowflake>,
    pub verify_emoji: String,
    pub form_url: String,
    pub webhook_secret: Option<String>,
}

impl FlowSettings {
    /// Derive flow settings from the application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            guild_id: config.discord.guild_id,
            roles: config.discord.roles,
            fast_track_invite_code: config.discord.fast_track_invite_code.clone(),
            intro_channel_id: config.discord.intro_channel_id,
            log_channel_id: config.discord.log_channel_id,
            verify_message_id: config.discord.verify_message_id,
            verify_emoji: config.discord.verify_emoji.clone(),
            form_url: config.verification.form_url.clone(),
            webhook_secret: config.verification.webhook_secret.clone(),
        }
    }

    /// Form URL carrying the given token
    pub fn form_link(&self, token: &str) -> String {
        let separator = if self.form_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}token={token}", self.form_url)
    }
}

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    gateway: Arc<dyn GuildGateway>,
    tokens: Arc<VerificationTokens>,
    settings: Arc<FlowSettings>,
    invites: Arc<Mutex<InviteUseTracker>>,
    connected: Arc<AtomicBool>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        gateway: Arc<dyn GuildGateway>,
        tokens: Arc<VerificationTokens>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            gateway,
            tokens,
            settings: Arc::new(settings),
            invites: Arc::new(Mutex::new(InviteUseTracker::new())),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a context straight from configuration
    pub fn from_config(config: &AppConfig, gateway: Arc<dyn GuildGateway>) -> Self {
        let tokens = VerificationTokens::new(
            &config.verification.jwt_secret,
            config.verification.token_ttl_secs,
        );
        Self::new(gateway, Arc::new(tokens), FlowSettings::from_config(config))
    }

    /// Get the platform gateway
    pub fn gateway(&self) -> &dyn GuildGateway {
        self.gateway.as_ref()
    }

    /// Get the verification token service
    pub fn tokens(&self) -> &VerificationTokens {
        &self.tokens
    }

    /// Get the flow settings
    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Get the managed role IDs
    pub fn roles(&self) -> &RoleIds {
        &self.settings.roles
    }

    /// Shared invite-use table; never hold the guard across an await
    pub fn invites(&self) -> &Mutex<InviteUseTracker> {
        &self.invites
    }

    /// Record whether the platform connection is up
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    /// Whether the platform connection is up
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("gateway", &"GuildGateway")
            .field("settings", &self.settings)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
