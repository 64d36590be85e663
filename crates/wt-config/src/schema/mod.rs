//! Configuration schema types for walkandtalk.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod player;
mod server;
mod session;

pub use logging::*;
pub use player::*;
pub use server::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WtConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub player: PlayerConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
