//! Keep-alive pinger
//!
//! Some hosts idle a process that receives no HTTP traffic. When a URL is
//! configured the bot requests it on a fixed interval.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use verigate_common::KeepAliveConfig;

/// Timeout for a single ping
const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Start the pinger if a URL is configured
pub fn spawn(config: &KeepAliveConfig) -> Option<JoinHandle<()>> {
    let url = config.url.clone()?;
    let period = Duration::from_secs(config.interval_secs.max(1));

    let client = match reqwest::Client::builder().timeout(PING_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Could not build keep-alive client");
            return None;
        }
    };

    info!(url = %url, interval_secs = period.as_secs(), "Keep-alive enabled");
    Some(tokio::spawn(run(client, url, period)))
}

async fn run(client: reqwest::Client, url: String, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately; skip it so the first ping waits a period
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "Keep-alive ping");
            }
            Ok(response) => warn!(status = %response.status(), "Keep-alive ping rejected"),
            Err(e) => warn!(error = %e, "Keep-alive ping failed"),
        }
    }
}
