//! Test fixtures
//!
//! A configuration matching the role IDs of the shared in-memory guild.

use std::collections::HashMap;

use verigate_common::AppConfig;
use verigate_core::Snowflake;

pub use verigate_service::test_utils::{MemoryGuild, MEMBER, UNVERIFIED, VERIFIED};

pub const GUILD_ID: Snowflake = Snowflake::new(1);
pub const JWT_SECRET: &str = "integration-test-secret";

/// Build a configuration without touching the process environment
pub fn test_config(extra: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("DISCORD_TOKEN", "test-token"),
        ("GUILD_ID", "1"),
        ("UNVERIFIED_ROLE_ID", "10"),
        ("VERIFIED_ROLE_ID", "20"),
        ("MEMBER_ROLE_ID", "30"),
        ("JWT_SECRET", JWT_SECRET),
        ("PORT", "0"),
        ("HOST", "127.0.0.1"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
    .collect();

    for (key, value) in extra {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}
