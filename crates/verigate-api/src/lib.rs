//! # verigate-api
//!
//! HTTP surface built with Axum: the form webhooks, a status endpoint, and a liveness
//! check.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_with_config, run, run_server};
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support;
