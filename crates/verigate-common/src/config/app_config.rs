//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::fmt;
use std::ops::RangeInclusive;

use verigate_core::{RoleIds, Snowflake};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub verification: VerificationConfig,
    pub rate_limit: RateLimitConfig,
    pub keep_alive: KeepAliveConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Force debug-level logging regardless of environment
    pub debug_logging: bool,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat platform configuration
#[derive(Clone)]
pub struct DiscordConfig {
    pub token: String,
    pub guild_id: Snowflake,
    pub roles: RoleIds,
    /// Invite code that grants Verified on join
    pub fast_track_invite_code: Option<String>,
    /// Channel where introductions promote Verified members to Member
    pub intro_channel_id: Option<Snowflake>,
    /// Channel that receives audit notifications
    pub log_channel_id: Option<Snowflake>,
    /// Message whose reaction DMs the form link
    pub verify_message_id: Option<Snowflake>,
    pub verify_emoji: String,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("guild_id", &self.guild_id)
            .field("roles", &self.roles)
            .field("fast_track_invite_code", &self.fast_track_invite_code)
            .field("intro_channel_id", &self.intro_channel_id)
            .field("log_channel_id", &self.log_channel_id)
            .field("verify_message_id", &self.verify_message_id)
            .field("verify_emoji", &self.verify_emoji)
            .finish_non_exhaustive()
    }
}

/// Form link and token configuration
#[derive(Clone)]
pub struct VerificationConfig {
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
    /// Base URL of the external form; the token is appended as a query parameter
    pub form_url: String,
    /// Shared secret the form sender presents to have `discord_id` honoured
    pub webhook_secret: Option<String>,
}

impl fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("form_url", &self.form_url)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<set>"))
            .finish_non_exhaustive()
    }
}

/// Rate limiting configuration for the webhook listener
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// External keep-alive pinger
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    pub url: Option<String>,
    pub interval_secs: u64,
}

// Default value functions
fn default_app_name() -> String {
    "verigate".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_token_ttl() -> i64 {
    86400 // 24 hours
}

/// Longest accepted form-link lifetime (30 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 86400;

fn default_form_url() -> String {
    "https://tally.so/r/mOkk2Y".to_string()
}

fn default_verify_emoji() -> String {
    "✅".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_keep_alive_interval() -> u64 {
    300
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
                debug_logging: vars.flag("DEBUG_LOGGING"),
            },
            server: ServerConfig {
                host: vars.get("HOST").unwrap_or_else(default_host),
                port: vars.required_parsed("PORT")?,
            },
            discord: DiscordConfig {
                token: vars.required("DISCORD_TOKEN")?,
                guild_id: vars.required_id("GUILD_ID")?,
                roles: RoleIds {
                    unverified: vars.required_id("UNVERIFIED_ROLE_ID")?,
                    verified: vars.required_id("VERIFIED_ROLE_ID")?,
                    member: vars.required_id("MEMBER_ROLE_ID")?,
                },
                fast_track_invite_code: vars.get("FAST_TRACK_INVITE_CODE"),
                intro_channel_id: vars.optional_id("INTRO_CHANNEL_ID")?,
                log_channel_id: vars.optional_id("LOG_CHANNEL_ID")?,
                verify_message_id: vars.optional_id("VERIFY_MESSAGE_ID")?,
                verify_emoji: vars.get("VERIFY_EMOJI").unwrap_or_else(default_verify_emoji),
            },
            verification: VerificationConfig {
                jwt_secret: vars.required("JWT_SECRET")?,
                token_ttl_secs: vars
                    .optional_bounded("TOKEN_TTL_SECS", 1..=MAX_TOKEN_TTL_SECS)?
                    .unwrap_or_else(default_token_ttl),
                form_url: vars.get("FORM_URL").unwrap_or_else(default_form_url),
                webhook_secret: vars.get("WEBHOOK_SECRET"),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .optional_parsed("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: vars
                    .optional_parsed("RATE_LIMIT_BURST")?
                    .unwrap_or_else(default_burst),
            },
            keep_alive: KeepAliveConfig {
                url: vars.get("KEEP_ALIVE_URL"),
                interval_secs: vars
                    .optional_parsed("KEEP_ALIVE_INTERVAL_SECS")?
                    .unwrap_or_else(default_keep_alive_interval),
            },
        })
    }
}

/// Lookup wrapper; blank values count as unset
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn required_parsed<T: std::str::FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.required(key)?;
        raw.parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
    }

    fn optional_parsed<T: std::str::FromStr>(
        &self,
        key: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
            })
            .transpose()
    }

    fn optional_bounded<T>(
        &self,
        key: &'static str,
        range: RangeInclusive<T>,
    ) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr + PartialOrd,
    {
        self.get(key)
            .map(|raw| match raw.parse::<T>() {
                Ok(value) if range.contains(&value) => Ok(value),
                _ => Err(ConfigError::InvalidValue(key, raw)),
            })
            .transpose()
    }

    fn required_id(&self, key: &'static str) -> Result<Snowflake, ConfigError> {
        self.required_parsed(key)
    }

    fn optional_id(&self, key: &'static str) -> Result<Option<Snowflake>, ConfigError> {
        self.optional_parsed(key)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| {
            matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DISCORD_TOKEN", "bot-token"),
            ("GUILD_ID", "1000"),
            ("UNVERIFIED_ROLE_ID", "1001"),
            ("VERIFIED_ROLE_ID", "1002"),
            ("MEMBER_ROLE_ID", "1003"),
            ("JWT_SECRET", "secret"),
            ("PORT", "3000"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| vars.get(key).map(ToString::to_string))
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.app.name, "verigate");
        assert_eq!(config.app.env, Environment::Development);
        assert!(!config.app.debug_logging);
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert_eq!(config.discord.guild_id, Snowflake::new(1000));
        assert_eq!(config.discord.roles.member, Snowflake::new(1003));
        assert_eq!(config.discord.fast_track_invite_code, None);
        assert_eq!(config.discord.verify_emoji, "✅");
        assert_eq!(config.verification.token_ttl_secs, 86400);
        assert_eq!(config.verification.form_url, "https://tally.so/r/mOkk2Y");
        assert!(config.verification.webhook_secret.is_none());
        assert_eq!(config.keep_alive.interval_secs, 300);
        assert!(config.keep_alive.url.is_none());
    }

    #[test]
    fn test_optional_values() {
        let mut vars = base_vars();
        vars.insert("APP_ENV", "Production");
        vars.insert("DEBUG_LOGGING", "true");
        vars.insert("FAST_TRACK_INVITE_CODE", "abc123");
        vars.insert("INTRO_CHANNEL_ID", "2000");
        vars.insert("LOG_CHANNEL_ID", "  ");
        vars.insert("KEEP_ALIVE_URL", "https://example.com/ping");

        let config = load(&vars).unwrap();

        assert!(config.app.env.is_production());
        assert!(config.app.debug_logging);
        assert_eq!(config.discord.fast_track_invite_code.as_deref(), Some("abc123"));
        assert_eq!(config.discord.intro_channel_id, Some(Snowflake::new(2000)));
        assert_eq!(config.discord.log_channel_id, None);
        assert_eq!(
            config.keep_alive.url.as_deref(),
            Some("https://example.com/ping")
        );
    }

    #[test]
    fn test_missing_required_var() {
        let mut vars = base_vars();
        vars.remove("JWT_SECRET");
        assert!(matches!(load(&vars), Err(ConfigError::MissingVar("JWT_SECRET"))));
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = base_vars();
        vars.insert("GUILD_ID", "not-a-number");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidValue("GUILD_ID", _))
        ));

        let mut vars = base_vars();
        vars.insert("PORT", "99999");
        assert!(matches!(load(&vars), Err(ConfigError::InvalidValue("PORT", _))));

        let mut vars = base_vars();
        vars.insert("VERIFIED_ROLE_ID", "0");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidValue("VERIFIED_ROLE_ID", _))
        ));
    }

    #[test]
    fn test_token_ttl_bounds() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECS", "3600");
        assert_eq!(load(&vars).unwrap().verification.token_ttl_secs, 3600);

        for bad in ["0", "-86400", "10000000000000000", "2592001", "soon"] {
            let mut vars = base_vars();
            vars.insert("TOKEN_TTL_SECS", bad);
            assert!(
                matches!(load(&vars), Err(ConfigError::InvalidValue("TOKEN_TTL_SECS", _))),
                "{bad} should be rejected"
            );
        }

        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECS", "2592000");
        assert_eq!(
            load(&vars).unwrap().verification.token_ttl_secs,
            MAX_TOKEN_TTL_SECS
        );
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let mut vars = base_vars();
        vars.insert("WEBHOOK_SECRET", "hook-secret");
        let config = load(&vars).unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("bot-token"));
        assert!(!debug.contains("hook-secret"));
        assert!(debug.contains("<set>"));
    }

    #[test]
    fn test_environment_helpers() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Development.is_development());
        assert_eq!(Environment::parse("staging"), Some(Environment::Staging));
        assert_eq!(Environment::parse("qa"), None);
    }
}
