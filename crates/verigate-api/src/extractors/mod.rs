//! Axum extractors for request handling

mod sender;

pub use sender::{WebhookSender, WEBHOOK_SECRET_HEADER};
