//! Inbound form-submission payload
//!
//! Form hosts differ in where they echo hidden fields back, so the token is looked
//! up in each known location in turn. The payload is kept as raw JSON rather than a
//! typed struct because only these few paths matter.

use serde_json::Value;
use verigate_core::Snowflake;

/// JSON pointers searched for the verification token, in order
const TOKEN_POINTERS: [&str; 4] = ["/hidden/token", "/data/hidden/token", "/fields/token", "/token"];

/// Identifiers carried by a form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    /// Member ID supplied directly by an integrated sender
    pub discord_id: Option<Snowflake>,
    /// Verification token echoed back from the form link
    pub token: Option<String>,
}

impl FormSubmission {
    /// Extract identifiers from a webhook body
    pub fn from_json(body: &Value) -> Self {
        let discord_id = body.get("discord_id").and_then(parse_id);

        let token = TOKEN_POINTERS
            .iter()
            .filter_map(|pointer| body.pointer(pointer))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|token| !token.is_empty())
            .map(str::to_string);

        Self { discord_id, token }
    }

    /// True when neither identifier is present
    pub fn is_empty(&self) -> bool {
        self.discord_id.is_none() && self.token.is_none()
    }
}

fn parse_id(value: &Value) -> Option<Snowflake> {
    match value {
        Value::String(s) => Snowflake::parse(s).ok(),
        Value::Number(n) => n.as_u64().filter(|id| *id != 0).map(Snowflake::new),
        _ => None,
    }
}
