//! # verigate-service
//!
//! Application layer: the role reconciler, invite attribution, and the token
//! correlation that ties form submissions back to members.

pub mod dto;
pub mod services;

pub use dto::{FormSubmission, ReconcileOutcome, RoleCycle, StatusResponse};
pub use services::{
    FlowSettings, InviteService, RoleReconciler, ServiceContext, ServiceError, ServiceResult,
    StartupDiagnostics, StatusService, VerificationService,
};

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
