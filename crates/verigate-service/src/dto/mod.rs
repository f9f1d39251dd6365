//! Data transfer objects
//!
//! This module provides:
//! - The inbound form-webhook payload and its identifier extraction
//! - Outcome and status types returned to the HTTP and command surfaces

pub mod form_webhook;
pub mod responses;

pub use form_webhook::FormSubmission;
pub use responses::{ReconcileOutcome, RoleCycle, StatusResponse};
