//! Poise framework setup
//!
//! Builds the framework with the commands and event hook, registers the commands
//! on the served guild once connected, and runs the client until it stops.

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use verigate_service::ServiceContext;

use crate::commands::{self, Data, Error};
use crate::events;

/// Gateway intents the handlers rely on
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_INVITES
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
}

/// Connect to Discord and process events until the client stops
pub async fn run_bot(token: &str, services: ServiceContext) -> Result<(), Error> {
    let guild_id = services.settings().guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                match commands::register(ctx, &framework.options().commands, guild_id).await {
                    Ok(()) => info!(guild_id = %guild_id, "Slash commands registered"),
                    Err(e) => warn!(guild_id = %guild_id, error = %e, "Slash command registration failed"),
                }
                Ok(Data { services })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents())
        .framework(framework)
        .await?;

    info!("Starting Discord client");
    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            warn!(command = %ctx.command().name, error = %error, "Command failed");
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            warn!(event = %event.snake_case_name(), error = %error, "Event handler failed");
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(error = %e, "Failed to report framework error");
            }
        }
    }
}
