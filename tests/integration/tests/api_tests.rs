//! API Integration Tests
//!
//! Drive the served application (rate limiting included) over HTTP against an
//! in-memory guild. No external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::{
    assert_json, assert_status, test_config, TestServer, JWT_SECRET, MEMBER, UNVERIFIED, VERIFIED,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use verigate_common::VerificationTokens;
use verigate_core::Snowflake;

const USER: Snowflake = Snowflake::new(123);

// ============================================================================
// Liveness and status
// ============================================================================

#[tokio::test]
async fn test_root_returns_ok() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_status_reports_guild() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/_status").await.unwrap();
    let status: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(status["status"], "ok");
    assert_eq!(status["discord_connected"], true);
    assert_eq!(status["guild_id"], "1");
    assert_eq!(status["guild_name"], "Test Guild");
    assert_eq!(status["bot_in_guild"], true);
    assert!(status["timestamp"].is_string());
}

#[tokio::test]
async fn test_status_is_200_when_degraded() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.services.set_connected(false);
    server.guild.leave();

    let response = server.get("/_status").await.unwrap();
    let status: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(status["status"], "degraded");
    assert_eq!(status["bot_in_guild"], false);
}

// ============================================================================
// Synchronous webhook
// ============================================================================

#[tokio::test]
async fn test_discord_id_promotes_unverified_member() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);

    let response = server
        .post("/form-webhook", &json!({ "discord_id": "123" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    assert_eq!(server.guild.roles_of(USER), vec![VERIFIED]);
}

#[tokio::test]
async fn test_token_from_each_payload_shape() {
    let server = TestServer::start().await.expect("Failed to start server");

    for (i, shape) in ["hidden", "data.hidden", "fields", "top"].iter().enumerate() {
        let member = Snowflake::new(1000 + i as u64);
        server.guild.add_member(member, &[UNVERIFIED]);
        let token = server.token_for(member).unwrap();
        let body = match *shape {
            "hidden" => json!({ "hidden": { "token": token } }),
            "data.hidden" => json!({ "data": { "hidden": { "token": token } } }),
            "fields" => json!({ "fields": { "token": token } }),
            _ => json!({ "token": token }),
        };

        let response = server.post("/form-webhook", &body).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
        assert_eq!(server.guild.roles_of(member), vec![VERIFIED], "shape {shape}");
    }
}

#[tokio::test]
async fn test_repeated_submission_is_idempotent() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED, MEMBER]);
    let body = json!({ "discord_id": 123 });

    for _ in 0..2 {
        let response = server.post("/form-webhook", &body).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    assert_eq!(server.guild.roles_of(USER), vec![MEMBER, VERIFIED]);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);
    let expired = VerificationTokens::new(JWT_SECRET, -60).issue(USER).unwrap();

    let response = server
        .post("/form-webhook", &json!({ "token": expired }))
        .await
        .unwrap();
    let error: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error["code"], "NO_IDENTIFIER");
    assert_eq!(server.guild.roles_of(USER), vec![UNVERIFIED]);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let forged = VerificationTokens::new("someone-else", 86400)
        .issue(USER)
        .unwrap();

    let response = server
        .post("/form-webhook", &json!({ "token": forged }))
        .await
        .unwrap();

    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_missing_identifier_and_bad_body() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/form-webhook", &json!({ "answers": [] }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.post_raw("/form-webhook", "plain text").await.unwrap();
    let error: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error["code"], "NO_IDENTIFIER");
}

#[tokio::test]
async fn test_member_who_left_still_gets_200() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/form-webhook", &json!({ "discord_id": "999" }))
        .await
        .unwrap();

    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Webhook secret
// ============================================================================

#[tokio::test]
async fn test_direct_id_requires_secret_when_configured() {
    let config = test_config(&[("WEBHOOK_SECRET", "shared")]).unwrap();
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);
    let body = json!({ "discord_id": "123" });

    let response = server.post("/form-webhook", &body).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_with_secret("/form-webhook", "wrong", &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(server.guild.roles_of(USER), vec![UNVERIFIED]);

    let response = server
        .post_with_secret("/form-webhook", "shared", &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(server.guild.roles_of(USER), vec![VERIFIED]);
}

#[tokio::test]
async fn test_token_still_works_without_secret_header() {
    let config = test_config(&[("WEBHOOK_SECRET", "shared")]).unwrap();
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);
    let token = server.token_for(USER).unwrap();

    let response = server
        .post("/form-webhook", &json!({ "token": token }))
        .await
        .unwrap();

    assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(server.guild.roles_of(USER), vec![VERIFIED]);
}

// ============================================================================
// Fast webhook
// ============================================================================

#[tokio::test]
async fn test_fast_webhook_applies_in_background() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);

    let response = server
        .post("/form-webhook-fast", &json!({ "discord_id": "123" }))
        .await
        .unwrap();
    let ack: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(ack["status"], "accepted");
    server.wait_for_roles(USER, &[VERIFIED]).await.unwrap();
}

#[tokio::test]
async fn test_fast_webhook_expired_token_returns_200_without_change() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);
    let expired = VerificationTokens::new(JWT_SECRET, -60).issue(USER).unwrap();

    let response = server
        .post("/form-webhook-fast", &json!({ "token": expired }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.guild.roles_of(USER), vec![UNVERIFIED]);
}

#[tokio::test]
async fn test_fast_webhook_accepts_garbage() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.post_raw("/form-webhook-fast", "{{{").await.unwrap();

    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Form link round trip
// ============================================================================

#[tokio::test]
async fn test_token_from_form_link_verifies_member() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.guild.add_member(USER, &[UNVERIFIED]);

    verigate_service::VerificationService::new(&server.services)
        .send_form_link(USER)
        .await
        .unwrap();
    let dm = server.guild.dms_to(USER).pop().expect("a DM was sent");
    let token = dm
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split(')').next())
        .expect("link carries a token")
        .to_string();

    let response = server
        .post("/form-webhook", &json!({ "hidden": { "token": token } }))
        .await
        .unwrap();

    assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(server.guild.roles_of(USER), vec![VERIFIED]);
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn test_rate_limit_leaves_webhooks_alone() {
    let config = test_config(&[
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST", "1"),
    ])
    .unwrap();
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    for _ in 0..5 {
        let response = server
            .post("/form-webhook", &json!({ "answers": [] }))
            .await
            .unwrap();
        assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

        let response = server
            .post("/form-webhook-fast", &json!({ "answers": [] }))
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let first = server.get("/_status").await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = server.get("/_status").await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
