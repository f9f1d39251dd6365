//! Errors returned by [`GuildGateway`](crate::traits::GuildGateway) implementations

use thiserror::Error;

/// Platform call failures, classified by how the caller should react
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Role deleted, channel gone
    #[error("Not found: {0}")]
    NotFound(String),

    /// The member is no longer in the guild
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    /// The bot lacks a permission or sits too low in the role hierarchy
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The user does not accept direct messages from the bot
    #[error("Direct messages are closed for this user")]
    DirectMessagesClosed,

    #[error("Rate limited by the platform")]
    RateLimited,

    /// Network failure or unexpected platform response
    #[error("Platform request failed: {0}")]
    Transient(String),
}

impl GatewayError {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create an unknown member error
    pub fn unknown_member(who: impl Into<String>) -> Self {
        Self::UnknownMember(who.into())
    }

    /// Create a forbidden error
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }

    /// Create a transient error
    pub fn transient(detail: impl Into<String>) -> Self {
        Self::Transient(detail.into())
    }

    /// Any missing target, member or otherwise
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::UnknownMember(_))
    }

    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    /// Stable code for logs and diagnostics output
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnknownMember(_) => "UNKNOWN_MEMBER",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::DirectMessagesClosed => "DMS_CLOSED",
            Self::RateLimited => "RATE_LIMITED",
            Self::Transient(_) => "PLATFORM_ERROR",
        }
    }
}

/// Result type for platform calls
pub type GatewayResult<T> = Result<T, GatewayError>;
