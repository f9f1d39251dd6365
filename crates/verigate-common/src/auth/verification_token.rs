//! Verification tokens
//!
//! Short-lived HS256 JWTs that bind a member ID to an expiry. The token travels in
//! the form link sent to the member and comes back in the form webhook, which is how
//! a submission is correlated to the member who asked for the link.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use verigate_core::Snowflake;

use crate::error::AppError;

/// JWT claims carried by a verification token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationClaims {
    /// Subject (member ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl VerificationClaims {
    /// Get the member ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject is not a valid Snowflake
    pub fn member_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// Issues and verifies verification tokens
#[derive(Clone)]
pub struct VerificationTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl VerificationTokens {
    /// Create a new token service with the given secret and lifetime
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for a member, valid from now
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, member_id: Snowflake) -> Result<String, AppError> {
        self.issue_at(member_id, Utc::now())
    }

    fn issue_at(&self, member_id: Snowflake, now: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!(
                    "Token lifetime of {}s is out of range",
                    self.ttl_secs
                ))
            })?;

        let claims = VerificationClaims {
            sub: member_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode token: {e}")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns `TokenExpired` past the expiry and `InvalidToken` for anything else
    pub fn decode(&self, token: &str) -> Result<VerificationClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<VerificationClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Verify a token and return the member it was issued for
    ///
    /// # Errors
    /// Returns an error if the token is expired, mis-signed, or malformed
    pub fn verify(&self, token: &str) -> Result<Snowflake, AppError> {
        self.decode(token)?.member_id()
    }
}

impl std::fmt::Debug for VerificationTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationTokens")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> VerificationTokens {
        VerificationTokens::new("test-secret-key-that-is-long-enough", 86400)
    }

    #[test]
    fn test_round_trip() {
        let service = create_test_service();
        let member = Snowflake::new(123_456_789);

        let token = service.issue(member).unwrap();
        assert_eq!(service.verify(&token).unwrap(), member);

        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.sub, "123456789");
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::hours(25);

        let token = service.issue_at(Snowflake::new(42), issued).unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_token_still_valid_just_inside_window() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::hours(23);

        let token = service.issue_at(Snowflake::new(42), issued).unwrap();

        assert_eq!(service.verify(&token).unwrap(), Snowflake::new(42));
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        for ttl in [10_000_000_000_000_000, i64::MAX, i64::MIN] {
            let service = VerificationTokens::new("s", ttl);
            assert!(
                matches!(service.issue(Snowflake::new(1)), Err(AppError::Internal(_))),
                "ttl {ttl}"
            );
        }
    }

    #[test]
    fn test_tampered_payload() {
        let service = create_test_service();
        let original = service.issue(Snowflake::new(1)).unwrap();
        let other = service.issue(Snowflake::new(2)).unwrap();

        // Splice the other token's payload under the original signature
        let original_parts: Vec<&str> = original.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            original_parts[0], other_parts[1], original_parts[2]
        );

        assert!(matches!(service.verify(&forged), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let service = create_test_service();
        let foreign = VerificationTokens::new("some-other-secret", 86400);

        let token = foreign.issue(Snowflake::new(7)).unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token() {
        let service = create_test_service();
        assert!(matches!(
            service.verify("invalid.token.here"),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(service.verify(""), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_claims_with_bad_subject() {
        let claims = VerificationClaims {
            sub: "not-a-member".to_string(),
            iat: 0,
            exp: i64::MAX,
        };
        assert!(matches!(claims.member_id(), Err(AppError::InvalidToken)));
    }
}
