//! Business logic services
//!
//! This module contains the services that turn platform events and webhook calls
//! into role changes, plus the dependency container they share.

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod invite;
pub mod reconciler;
pub mod status;
pub mod verification;

// Re-export all services for convenience
pub use context::{FlowSettings, ServiceContext};
pub use diagnostics::StartupDiagnostics;
pub use error::{ServiceError, ServiceResult};
pub use invite::InviteService;
pub use reconciler::RoleReconciler;
pub use status::StatusService;
pub use verification::VerificationService;
