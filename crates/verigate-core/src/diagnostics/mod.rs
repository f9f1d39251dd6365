//! Startup diagnostics

mod role_hierarchy;

pub use role_hierarchy::{diagnose_role_layout, RoleLayout, RolePosition, RoleProblem};
