//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use std::fmt;
use verigate_common::AppError;
use verigate_core::GatewayError;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Platform call failed
    Gateway(GatewayError),

    /// Token issuing or decoding failed
    App(AppError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gateway(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gateway(e) => Some(e),
            Self::App(e) => Some(e),
        }
    }
}

impl ServiceError {
    /// The platform error behind this failure, if any
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(e) => Some(e),
            Self::App(_) => None,
        }
    }

    /// Whether the bot lacked a permission
    pub fn is_authorization(&self) -> bool {
        self.gateway_error().is_some_and(GatewayError::is_authorization)
    }

    /// Stable code for structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Gateway(e) => e.code(),
            Self::App(e) => e.error_code(),
        }
    }
}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
