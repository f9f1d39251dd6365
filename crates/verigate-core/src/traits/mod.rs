//! Ports - interfaces the domain needs from the outside world

mod gateway;

pub use gateway::{GuildGateway, GuildPresence};
