//! Domain errors - failures reported by the platform port

mod gateway_error;

pub use gateway_error::{GatewayError, GatewayResult};
