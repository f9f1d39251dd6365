//! Event filters
//!
//! Pure checks deciding whether a gateway event is one the bot acts on.

use poise::serenity_prelude as serenity;
use verigate_core::Snowflake;

/// A member finished membership screening in this update.
///
/// When the previous state is unknown the update counts as completion only if it
/// clears `pending`; a later unrelated update re-triggers, which the role plan
/// tolerates.
pub fn screening_completed(old_pending: Option<bool>, new_pending: bool) -> bool {
    !new_pending && old_pending != Some(false)
}

/// A human message in the introduction channel
pub fn is_introduction(
    channel_id: Snowflake,
    author_is_bot: bool,
    intro_channel: Option<Snowflake>,
) -> bool {
    !author_is_bot && intro_channel == Some(channel_id)
}

/// The configured emoji on the configured verification message
pub fn is_verify_reaction(
    message_id: Snowflake,
    emoji: &serenity::ReactionType,
    verify_message: Option<Snowflake>,
    verify_emoji: &str,
) -> bool {
    verify_message == Some(message_id) && emoji_matches(emoji, verify_emoji)
}

fn emoji_matches(emoji: &serenity::ReactionType, expected: &str) -> bool {
    match emoji {
        serenity::ReactionType::Unicode(value) => value == expected,
        serenity::ReactionType::Custom { name, .. } => name.as_deref() == Some(expected),
        _ => false,
    }
}

/// Whether a guild-scoped event belongs to the served guild
pub fn in_guild(event_guild: Option<Snowflake>, served: Snowflake) -> bool {
    event_guild == Some(served)
}
