//! # verigate-bot
//!
//! Discord side of the verification bot: a `GuildGateway` backed by the serenity
//! HTTP client, the event handlers that turn gateway events into triggers, the
//! slash commands, and the keep-alive pinger.

pub mod commands;
pub mod events;
pub mod framework;
pub mod gateway;
pub mod keepalive;

pub use commands::{Context, Data, Error};
pub use framework::run_bot;
pub use gateway::SerenityGateway;
