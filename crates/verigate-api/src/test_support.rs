//! App builders for handler tests

use std::sync::Arc;

use axum::Router;
use verigate_common::VerificationTokens;
use verigate_core::{RoleIds, Snowflake};
use verigate_service::test_utils::{MemoryGuild, MEMBER, UNVERIFIED, VERIFIED};
use verigate_service::{FlowSettings, ServiceContext};

use crate::server::create_app;
use crate::state::AppState;

pub const JWT_SECRET: &str = "api-test-secret";

pub fn settings(webhook_secret: Option<&str>) -> FlowSettings {
    FlowSettings {
        guild_id: Snowflake::new(1),
        roles: RoleIds {
            unverified: UNVERIFIED,
            verified: VERIFIED,
            member: MEMBER,
        },
        fast_track_invite_code: None,
        intro_channel_id: None,
        log_channel_id: None,
        verify_message_id: None,
        verify_emoji: "✅".to_string(),
        form_url: "https://forms.example/r/abc".to_string(),
        webhook_secret: webhook_secret.map(str::to_string),
    }
}

pub fn test_state(webhook_secret: Option<&str>) -> (AppState, ServiceContext, Arc<MemoryGuild>) {
    let guild = Arc::new(MemoryGuild::new());
    let ctx = ServiceContext::new(
        guild.clone(),
        Arc::new(VerificationTokens::new(JWT_SECRET, 86400)),
        settings(webhook_secret),
    );
    (AppState::new(ctx.clone()), ctx, guild)
}

pub fn test_app(webhook_secret: Option<&str>) -> (Router, ServiceContext, Arc<MemoryGuild>) {
    let (state, ctx, guild) = test_state(webhook_secret);
    (create_app(state), ctx, guild)
}
