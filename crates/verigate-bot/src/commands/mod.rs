//! Slash commands
//!
//! Both commands act on the invoking member and reply ephemerally.

use poise::serenity_prelude as serenity;
use tracing::warn;
use verigate_core::{GatewayError, Snowflake};
use verigate_service::{
    RoleCycle, RoleReconciler, ServiceContext, ServiceError, VerificationService,
};

/// Data shared with every command and event handler
pub struct Data {
    pub services: ServiceContext,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

const DMS_SENT: &str = "Check your DMs 👍";
const DMS_CLOSED: &str = "I couldn't DM you. Please enable direct messages from server members \
     (Server → Privacy Settings) and run /verify again.";

/// Every command the bot registers
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![verify(), role_debug()]
}

fn author_id(ctx: Context<'_>) -> Snowflake {
    Snowflake::new(ctx.author().id.get())
}

/// Reply text for a `verify` attempt
fn verify_reply(result: &Result<(), ServiceError>) -> String {
    match result {
        Ok(()) => DMS_SENT.to_string(),
        Err(e) if e.gateway_error() == Some(&GatewayError::DirectMessagesClosed) => {
            DMS_CLOSED.to_string()
        }
        Err(_) => "Something went wrong sending your verification link. Please try again later."
            .to_string(),
    }
}

/// Reply text for a `role_debug` run
fn role_debug_reply(cycles: &[RoleCycle]) -> String {
    let mut lines = Vec::with_capacity(cycles.len() + 1);
    lines.push(if cycles.iter().all(RoleCycle::is_ok) {
        "All role changes succeeded.".to_string()
    } else {
        "Some role changes failed; check Manage Roles and the role order.".to_string()
    });
    lines.extend(cycles.iter().map(RoleCycle::summary));
    lines.join("\n")
}

/// DM yourself a fresh verification form link
#[poise::command(slash_command, guild_only, ephemeral)]
pub async fn verify(ctx: Context<'_>) -> Result<(), Error> {
    let member_id = author_id(ctx);
    let result = VerificationService::new(&ctx.data().services)
        .send_form_link(member_id)
        .await;

    if let Err(e) = &result {
        warn!(user_id = %member_id, error = %e, "verify command could not deliver link");
    }

    ctx.say(verify_reply(&result)).await?;
    Ok(())
}

/// Cycle the managed roles on yourself to check the bot's permissions
#[poise::command(slash_command, guild_only, ephemeral)]
pub async fn role_debug(ctx: Context<'_>) -> Result<(), Error> {
    let member_id = author_id(ctx);
    let reply = match RoleReconciler::new(&ctx.data().services)
        .debug_cycle(member_id)
        .await
    {
        Ok(cycles) => role_debug_reply(&cycles),
        Err(e) => {
            warn!(user_id = %member_id, error = %e, "role_debug failed");
            format!("Could not read your roles: {e}")
        }
    };

    ctx.say(reply).await?;
    Ok(())
}

/// Register the commands on one guild
pub async fn register(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    guild_id: Snowflake,
) -> Result<(), Error> {
    if guild_id.is_zero() {
        anyhow::bail!("guild id is zero");
    }
    poise::builtins::register_in_guild(ctx, commands, serenity::GuildId::new(guild_id.get()))
        .await?;
    Ok(())
}
