use serde::{Deserialize, Serialize};

/// Game session timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed delay between join attempts.
    pub join_retry_delay_ms: u64,
    /// Maximum join attempts; 0 retries forever.
    pub join_max_attempts: u32,
    pub heartbeat_interval_ms: u64,
    /// Capacity of the session event channel.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            join_retry_delay_ms: 1000,
            join_max_attempts: 0,
            heartbeat_interval_ms: 5000,
            event_buffer: 256,
        }
    }
}
