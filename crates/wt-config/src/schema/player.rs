use serde::{Deserialize, Serialize};

/// How every player is drawn and how fast it glides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Visual type: `circle` or `rect`.
    pub shape: String,
    /// Circle radius, or rect edge length.
    pub size: f64,
    /// Movement speed in stage units per second.
    pub speed: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            shape: "circle".into(),
            size: 10.0,
            speed: 600.0,
        }
    }
}
