//! Outcome and status types
//!
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use verigate_core::{GuildPresence, RoleKind, Snowflake, Trigger};

/// Result of applying one trigger to one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub member_id: Snowflake,
    pub trigger: Trigger,
    pub added: Vec<RoleKind>,
    pub removed: Vec<RoleKind>,
    /// Set when the trigger delivers a form link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_delivered: Option<bool>,
    pub audited: bool,
}

impl ReconcileOutcome {
    pub(crate) fn new(member_id: Snowflake, trigger: Trigger) -> Self {
        Self {
            member_id,
            trigger,
            added: Vec::new(),
            removed: Vec::new(),
            link_delivered: None,
            audited: false,
        }
    }

    /// True when no role changed
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Direction of one role-debug step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleAction {
    Add,
    Remove,
}

/// One mutation attempted by the role-debug command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStep {
    pub action: CycleAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of cycling one managed role on the invoking member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCycle {
    pub role: RoleKind,
    pub role_id: Snowflake,
    pub held: bool,
    pub steps: Vec<CycleStep>,
}

impl RoleCycle {
    /// True when every step succeeded
    pub fn is_ok(&self) -> bool {
        self.steps.iter().all(|step| step.error.is_none())
    }

    /// One line for a command reply
    pub fn summary(&self) -> String {
        let mut line = format!("{} (<@&{}>): ", self.role, self.role_id);
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                line.push_str(" → ");
            }
            let action = match step.action {
                CycleAction::Add => "add",
                CycleAction::Remove => "remove",
            };
            match &step.error {
                None => {
                    let _ = write!(line, "{action} ok");
                }
                Some(error) => {
                    let _ = write!(line, "{action} failed ({error})");
                }
            }
        }
        line
    }
}

/// Diagnostic body for `GET /_status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub discord_connected: bool,
    pub guild_id: Snowflake,
    pub guild_name: Option<String>,
    pub bot_in_guild: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl StatusResponse {
    /// Build a status from the connection flag and a guild presence result
    pub fn from_presence(
        guild_id: Snowflake,
        connected: bool,
        presence: Result<GuildPresence, String>,
    ) -> Self {
        let (guild_name, bot_in_guild, error) = match presence {
            Ok(presence) => (presence.guild_name, presence.bot_is_member, None),
            Err(error) => (None, false, Some(error)),
        };
        let healthy = connected && bot_in_guild;

        Self {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            discord_connected: connected,
            guild_id,
            guild_name,
            bot_in_guild,
            error,
            timestamp: Utc::now(),
        }
    }
}
