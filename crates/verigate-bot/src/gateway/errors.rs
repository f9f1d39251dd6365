//! Discord error classification

use serenity::http::HttpError;
use verigate_core::GatewayError;

// JSON error codes from the Discord API
const UNKNOWN_CHANNEL: isize = 10003;
const UNKNOWN_GUILD: isize = 10004;
const UNKNOWN_MEMBER: isize = 10007;
const UNKNOWN_ROLE: isize = 10011;
const UNKNOWN_USER: isize = 10013;
const MISSING_ACCESS: isize = 50001;
const CANNOT_MESSAGE_USER: isize = 50007;
const MISSING_PERMISSIONS: isize = 50013;

/// Map a failed API response onto the gateway taxonomy
pub fn classify(status: u16, code: isize, message: &str) -> GatewayError {
    match (status, code) {
        // Comes back as a 403, so check it before the generic forbidden arm
        (_, CANNOT_MESSAGE_USER) => GatewayError::DirectMessagesClosed,
        (_, MISSING_ACCESS | MISSING_PERMISSIONS) | (403, _) => GatewayError::forbidden(message),
        (_, UNKNOWN_MEMBER | UNKNOWN_USER) => GatewayError::unknown_member(message),
        (_, UNKNOWN_CHANNEL | UNKNOWN_GUILD | UNKNOWN_ROLE) | (404, _) => {
            GatewayError::not_found(message)
        }
        (429, _) => GatewayError::RateLimited,
        _ => GatewayError::transient(format!("HTTP {status} (code {code}): {message}")),
    }
}

/// Convert a serenity error
pub fn from_serenity(err: &serenity::Error) -> GatewayError {
    match err {
        serenity::Error::Http(http_err) => {
            let http_err: &HttpError = http_err;
            match http_err {
                HttpError::UnsuccessfulRequest(response) => classify(
                    response.status_code.as_u16(),
                    response.error.code,
                    &response.error.message,
                ),
                other => GatewayError::transient(other.to_string()),
            }
        }
        other => GatewayError::transient(other.to_string()),
    }
}
