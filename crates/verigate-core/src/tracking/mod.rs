//! In-memory tracking of platform state that the bot has to diff against

mod invite_tracker;

pub use invite_tracker::InviteUseTracker;
