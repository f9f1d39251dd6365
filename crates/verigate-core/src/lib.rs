//! # verigate-core
//!
//! Domain layer: identifiers, the role model, reconciliation triggers, invite-use
//! tracking, and the port through which the chat platform is reached.
//! This crate has zero dependencies on infrastructure (platform SDK, web framework).

pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod traits;
pub mod tracking;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use diagnostics::{diagnose_role_layout, RoleLayout, RolePosition, RoleProblem};
pub use entities::{plan, InviteUse, RoleIds, RoleKind, RolePlan, Trigger};
pub use error::{GatewayError, GatewayResult};
pub use traits::{GuildGateway, GuildPresence};
pub use tracking::InviteUseTracker;
pub use value_objects::{Snowflake, SnowflakeParseError};
