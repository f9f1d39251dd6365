//! Test helpers for integration tests
//!
//! Spawns the served application on an ephemeral port and wraps a reqwest client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use verigate_api::{create_app_with_config, AppState};
use verigate_common::AppConfig;
use verigate_core::Snowflake;
use verigate_service::ServiceContext;

use crate::fixtures::{test_config, MemoryGuild};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub guild: Arc<MemoryGuild>,
    pub services: ServiceContext,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(&[])?).await
    }

    /// Start a server with a custom configuration
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let guild = Arc::new(MemoryGuild::new());
        let services = ServiceContext::from_config(&config, guild.clone());
        services.set_connected(true);

        let app = create_app_with_config(AppState::new(services.clone()), &config)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            guild,
            services,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with JSON body and the webhook secret header
    pub async fn post_with_secret<T: Serialize>(
        &self,
        path: &str,
        secret: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("x-webhook-secret", secret)
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with a raw body
    pub async fn post_raw(&self, path: &str, body: &'static str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("content-type", "text/plain")
            .body(body)
            .send()
            .await?)
    }

    /// Issue a verification token the server will accept
    pub fn token_for(&self, member_id: Snowflake) -> Result<String> {
        Ok(self.services.tokens().issue(member_id)?)
    }

    /// Poll until a member's roles match, for work done off the request path
    pub async fn wait_for_roles(&self, member_id: Snowflake, expected: &[Snowflake]) -> Result<()> {
        for _ in 0..100 {
            if self.guild.roles_of(member_id) == expected {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!(
            "Roles of {member_id} never became {expected:?}; last seen {:?}",
            self.guild.roles_of(member_id)
        )
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
