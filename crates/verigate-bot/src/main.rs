//! Verigate entry point
//!
//! Run with:
//! ```bash
//! cargo run -p verigate-bot
//! ```
//!
//! Runs the Discord client and the webhook server in one process. Configuration is
//! loaded from environment variables (and `.env`).

use std::sync::Arc;

use anyhow::Context as _;
use serenity::http::Http;
use tracing::{error, info};
use verigate_bot::{keepalive, run_bot, SerenityGateway};
use verigate_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use verigate_service::ServiceContext;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_settings(&config.app)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %format!("{e:#}"), "Verigate stopped");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!(
        env = ?config.app.env,
        port = config.server.port,
        guild_id = %config.discord.guild_id,
        "Configuration loaded"
    );

    let http = Arc::new(Http::new(&config.discord.token));
    let gateway = SerenityGateway::new(http, config.discord.guild_id)
        .context("Invalid guild id")?;
    let services = ServiceContext::from_config(&config, Arc::new(gateway));

    let _pinger = keepalive::spawn(&config.keep_alive);

    let server = {
        let config = config.clone();
        let services = services.clone();
        tokio::spawn(async move { verigate_api::run(&config, services).await })
    };

    tokio::select! {
        result = run_bot(&config.discord.token, services) => {
            result.context("Discord client stopped")?;
        }
        result = server => {
            result
                .context("HTTP server task panicked")?
                .context("HTTP server stopped")?;
        }
    }

    Ok(())
}
