//! Settings, events, and commands of the game session.

use std::time::Duration;

use wt_common::{PlayerId, Point};

use crate::handshake::RetryPolicy;
use crate::heartbeat::DEFAULT_HEARTBEAT_INTERVAL;
use crate::roster::PlayerStyle;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub retry: RetryPolicy,
    pub heartbeat_interval: Duration,
    pub style: PlayerStyle,
    /// Capacity of the [`SessionEvent`] channel.
    pub event_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            style: PlayerStyle::default(),
            event_buffer: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Lifecycle notifications for the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Transport session established; the join handshake starts next.
    Connected { session_id: u64 },
    /// Join attempt `attempt` is going out. Show a connecting state.
    Joining { attempt: u32 },
    /// Handshake done; `players` counts the seeded roster, us included.
    Joined { player_id: PlayerId, players: usize },
    PlayerJoined(PlayerId),
    PlayerLeft(PlayerId),
    /// The server removed the local player.
    Ejected(PlayerId),
    SubscriptionFailed { topic: String, error: String },
    /// The session is over and inert.
    Closed { reason: String },
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionCommand {
    PointerDown(Point),
    Leave,
}
