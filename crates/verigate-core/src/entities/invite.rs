//! Invite snapshot - an invite code with its cumulative use count

use serde::{Deserialize, Serialize};

/// One observation of an invite's use count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteUse {
    pub code: String,
    pub uses: u64,
}

impl InviteUse {
    /// Create a new observation
    pub fn new(code: impl Into<String>, uses: u64) -> Self {
        Self {
            code: code.into(),
            uses,
        }
    }
}
