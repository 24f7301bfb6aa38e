mod core;
mod error;
mod models;

pub use self::core::*;
pub use error::GatewayError;
pub use models::{ChatTurn, Role, Transcript};
