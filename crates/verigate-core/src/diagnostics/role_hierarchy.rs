//! Role hierarchy checks
//!
//! The platform only lets a bot assign roles that sit strictly below its own highest
//! role, and only if one of its roles grants Manage Roles (or Administrator). These
//! checks run once the bot is connected so misconfiguration shows up in the logs
//! before the first member joins.

use serde::Serialize;
use std::fmt;

use crate::entities::{RoleIds, RoleKind};
use crate::value_objects::Snowflake;

/// Position of one guild role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RolePosition {
    pub id: Snowflake,
    pub position: u16,
}

/// What the bot can see of the guild's role list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleLayout {
    /// Manage Roles or Administrator via any of the bot's roles
    pub bot_can_manage_roles: bool,
    /// Position of the bot's highest role
    pub bot_top_position: u16,
    pub roles: Vec<RolePosition>,
}

impl RoleLayout {
    fn position_of(&self, id: Snowflake) -> Option<u16> {
        self.roles.iter().find(|r| r.id == id).map(|r| r.position)
    }
}

/// A configuration problem that will make role mutations fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum RoleProblem {
    MissingManageRoles,
    RoleNotFound {
        kind: RoleKind,
        id: Snowflake,
    },
    RoleNotBelowBot {
        kind: RoleKind,
        id: Snowflake,
        position: u16,
        bot_position: u16,
    },
}

impl fmt::Display for RoleProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingManageRoles => {
                write!(f, "bot has neither Manage Roles nor Administrator")
            }
            Self::RoleNotFound { kind, id } => {
                write!(f, "{kind} role {id} does not exist in the guild")
            }
            Self::RoleNotBelowBot {
                kind,
                id,
                position,
                bot_position,
            } => write!(
                f,
                "{kind} role {id} is at position {position}, not below the bot's top role at {bot_position}"
            ),
        }
    }
}

/// Check every managed role against the bot's standing
pub fn diagnose_role_layout(layout: &RoleLayout, roles: &RoleIds) -> Vec<RoleProblem> {
    let mut problems = Vec::new();

    if !layout.bot_can_manage_roles {
        problems.push(RoleProblem::MissingManageRoles);
    }

    for kind in RoleKind::ALL {
        let id = roles.get(kind);
        match layout.position_of(id) {
            None => problems.push(RoleProblem::RoleNotFound { kind, id }),
            Some(position) if position >= layout.bot_top_position => {
                problems.push(RoleProblem::RoleNotBelowBot {
                    kind,
                    id,
                    position,
                    bot_position: layout.bot_top_position,
                });
            }
            Some(_) => {}
        }
    }

    problems
}
