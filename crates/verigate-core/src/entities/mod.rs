//! Domain entities - the role model, reconciliation triggers, and invite snapshots

mod invite;
mod role;
mod trigger;

pub use invite::InviteUse;
pub use role::{RoleIds, RoleKind};
pub use trigger::{plan, RolePlan, Trigger};
