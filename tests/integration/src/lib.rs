//! Integration test utilities for verigate
//!
//! Spawns the HTTP surface against an in-memory guild and drives it over real
//! sockets.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
