//! Router connection settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// WebSocket URL of the WAMP router.
    pub url: String,
    /// Realm joined on connect.
    pub realm: String,
    /// Upper bound for the WebSocket + WAMP handshake.
    pub connect_timeout_secs: u64,
    /// Upper bound for an awaited RPC call (join).
    pub call_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080/ws".into(),
            realm: "realm1".into(),
            connect_timeout_secs: 15,
            call_timeout_secs: 10,
        }
    }
}
