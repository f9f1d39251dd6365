//! Role model - the three roles the verification flow moves members through

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// The roles managed by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Assigned on arrival, removed once the form is submitted
    Unverified,
    /// Granted after form submission or a fast-track invite
    Verified,
    /// Granted after the member posts an introduction
    Member,
}

impl RoleKind {
    /// All managed roles, in promotion order
    pub const ALL: [RoleKind; 3] = [RoleKind::Unverified, RoleKind::Verified, RoleKind::Member];

    /// Name used in logs and command replies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Verified => "verified",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform role IDs for each managed role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIds {
    pub unverified: Snowflake,
    pub verified: Snowflake,
    pub member: Snowflake,
}

impl RoleIds {
    /// Get the platform role ID for a role kind
    #[inline]
    pub fn get(&self, kind: RoleKind) -> Snowflake {
        match kind {
            RoleKind::Unverified => self.unverified,
            RoleKind::Verified => self.verified,
            RoleKind::Member => self.member,
        }
    }

    /// Find the role kind a platform role ID belongs to
    pub fn kind_of(&self, role_id: Snowflake) -> Option<RoleKind> {
        RoleKind::ALL.into_iter().find(|kind| self.get(*kind) == role_id)
    }

    /// Check whether a live role set contains the given role kind
    #[inline]
    pub fn holds(&self, current: &[Snowflake], kind: RoleKind) -> bool {
        current.contains(&self.get(kind))
    }
}
