//! Reconciliation triggers and the role plan each one produces
//!
//! Planning is a pure function of the trigger and the member's live role set, so
//! applying the same trigger twice yields an empty plan the second time.

use serde::Serialize;
use std::fmt;

use super::role::{RoleIds, RoleKind};
use crate::value_objects::Snowflake;

/// Observed event that may change a member's roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Member joined through the configured fast-track invite
    JoinedViaTrackedInvite,
    /// Member joined through any other invite, a vanity URL, or an unknown route
    JoinedOtherwise,
    /// Member completed the platform's membership screening
    ScreeningAccepted,
    /// The external form reported a submission for this member
    FormSubmitted,
    /// Member posted in the introduction channel
    IntroductionPosted,
}

impl Trigger {
    /// Classify a join given the invite code it was attributed to
    pub fn for_join(used_code: Option<&str>, fast_track_code: Option<&str>) -> Self {
        match (used_code, fast_track_code) {
            (Some(used), Some(fast)) if used == fast => Self::JoinedViaTrackedInvite,
            _ => Self::JoinedOtherwise,
        }
    }

    /// Whether this trigger should also deliver a fresh form link
    pub fn sends_form_link(&self) -> bool {
        matches!(self, Self::JoinedOtherwise)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JoinedViaTrackedInvite => "joined_via_tracked_invite",
            Self::JoinedOtherwise => "joined_otherwise",
            Self::ScreeningAccepted => "screening_accepted",
            Self::FormSubmitted => "form_submitted",
            Self::IntroductionPosted => "introduction_posted",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal set of role changes for one trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolePlan {
    pub remove: Vec<RoleKind>,
    pub add: Vec<RoleKind>,
    /// Emit an audit notification once the plan is applied
    pub audit: bool,
}

impl RolePlan {
    /// True when nothing needs to change
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Compute the role changes a trigger requires against the live role set
pub fn plan(trigger: Trigger, current: &[Snowflake], roles: &RoleIds) -> RolePlan {
    let holds = |kind| roles.holds(current, kind);
    let mut plan = RolePlan::default();

    match trigger {
        Trigger::JoinedViaTrackedInvite | Trigger::FormSubmitted => {
            if holds(RoleKind::Unverified) {
                plan.remove.push(RoleKind::Unverified);
            }
            if !holds(RoleKind::Verified) {
                plan.add.push(RoleKind::Verified);
            }
        }
        Trigger::JoinedOtherwise => {
            if !holds(RoleKind::Unverified) {
                plan.add.push(RoleKind::Unverified);
            }
        }
        Trigger::ScreeningAccepted => {
            if !holds(RoleKind::Unverified) && !holds(RoleKind::Verified) {
                plan.add.push(RoleKind::Unverified);
            }
        }
        Trigger::IntroductionPosted => {
            if holds(RoleKind::Verified) && !holds(RoleKind::Member) {
                plan.add.push(RoleKind::Member);
                plan.audit = true;
            }
        }
    }

    plan
}
