//! Verification token utilities

mod verification_token;

pub use verification_token::{VerificationClaims, VerificationTokens};
