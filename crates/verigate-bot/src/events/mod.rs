//! Gateway event handlers
//!
//! Translate serenity events into service calls. Every failure is logged here and
//! swallowed so nothing reaches the framework's event loop.

pub mod predicates;

use poise::serenity_prelude as serenity;
use ::serenity::gateway::ConnectionStage;
use serenity::FullEvent;
use tracing::{debug, info, warn};
use verigate_core::{Snowflake, Trigger};
use verigate_service::{
    InviteService, RoleReconciler, ServiceContext, StartupDiagnostics, VerificationService,
};

use crate::commands::{Data, Error};
use predicates::{in_guild, is_introduction, is_verify_reaction, screening_completed};

fn id(raw: u64) -> Snowflake {
    Snowflake::new(raw)
}

/// Framework event hook
pub async fn handle_event(
    _ctx: &serenity::Context,
    event: &FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    let services = &data.services;
    let guild_id = services.settings().guild_id;

    match event {
        FullEvent::Ready { data_about_bot } => {
            info!(bot = %data_about_bot.user.name, "Connected to Discord");
            on_ready(services).await;
        }
        FullEvent::Resume { .. } => services.set_connected(true),
        FullEvent::ShardStageUpdate { event } => {
            let connected = matches!(event.new, ConnectionStage::Connected);
            debug!(stage = ?event.new, connected, "Shard stage changed");
            services.set_connected(connected);
        }
        FullEvent::GuildMemberAddition { new_member } => {
            if in_guild(Some(id(new_member.guild_id.get())), guild_id) && !new_member.user.bot {
                on_member_join(services, id(new_member.user.id.get())).await;
            }
        }
        FullEvent::GuildMemberUpdate {
            old_if_available,
            event,
            ..
        } => {
            let old_pending = old_if_available.as_ref().map(|m| m.pending);
            if in_guild(Some(id(event.guild_id.get())), guild_id)
                && screening_completed(old_pending, event.pending)
            {
                apply(services, id(event.user.id.get()), Trigger::ScreeningAccepted).await;
            }
        }
        FullEvent::Message { new_message } => {
            let message_guild = new_message.guild_id.map(|g| id(g.get()));
            if in_guild(message_guild, guild_id)
                && is_introduction(
                    id(new_message.channel_id.get()),
                    new_message.author.bot,
                    services.settings().intro_channel_id,
                )
            {
                apply(
                    services,
                    id(new_message.author.id.get()),
                    Trigger::IntroductionPosted,
                )
                .await;
            }
        }
        FullEvent::ReactionAdd { add_reaction } => {
            let Some(user_id) = add_reaction.user_id else {
                return Ok(());
            };
            let from_bot = user_id == framework.bot_id
                || add_reaction.member.as_ref().is_some_and(|m| m.user.bot);
            let settings = services.settings();

            if !from_bot
                && in_guild(add_reaction.guild_id.map(|g| id(g.get())), guild_id)
                && is_verify_reaction(
                    id(add_reaction.message_id.get()),
                    &add_reaction.emoji,
                    settings.verify_message_id,
                    &settings.verify_emoji,
                )
            {
                on_verify_reaction(services, id(user_id.get())).await;
            }
        }
        FullEvent::InviteCreate { data: invite } => {
            if in_guild(invite.guild_id.map(|g| id(g.get())), guild_id) {
                debug!(code = %invite.code, "Invite created, reseeding");
                if let Err(e) = InviteService::new(services).seed().await {
                    warn!(code = e.error_code(), error = %e, "Failed to reseed invites");
                }
            }
        }
        FullEvent::InviteDelete { data: invite } => {
            if in_guild(invite.guild_id.map(|g| id(g.get())), guild_id) {
                InviteService::new(services).forget(&invite.code);
            }
        }
        _ => {}
    }

    Ok(())
}

async fn on_ready(services: &ServiceContext) {
    services.set_connected(true);

    match InviteService::new(services).seed().await {
        Ok(count) => info!(count, "Invite uses cached"),
        Err(e) => warn!(
            code = e.error_code(),
            error = %e,
            "Could not cache invites; joins will be unattributed"
        ),
    }

    if let Err(e) = StartupDiagnostics::new(services).run().await {
        warn!(code = e.error_code(), error = %e, "Could not inspect the role hierarchy");
    }
}

async fn on_member_join(services: &ServiceContext, member_id: Snowflake) {
    if let Err(e) = InviteService::new(services).handle_join(member_id).await {
        warn!(user_id = %member_id, code = e.error_code(), error = %e, "Join handling failed");
    }
}

async fn on_verify_reaction(services: &ServiceContext, member_id: Snowflake) {
    match VerificationService::new(services)
        .send_form_link(member_id)
        .await
    {
        Ok(()) => info!(user_id = %member_id, "Form link sent after reaction"),
        Err(e) => warn!(
            user_id = %member_id,
            code = e.error_code(),
            error = %e,
            "Could not DM form link after reaction"
        ),
    }
}

async fn apply(services: &ServiceContext, member_id: Snowflake, trigger: Trigger) {
    if let Err(e) = RoleReconciler::new(services).apply(member_id, trigger).await {
        warn!(
            user_id = %member_id,
            trigger = %trigger,
            code = e.error_code(),
            error = %e,
            "Trigger not applied"
        );
    }
}
