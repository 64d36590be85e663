//! Session lifecycle and state synchronization for the walkandtalk game.
//!
//! A [`WampClient`] connects to the router; a [`GameClient`] runs the
//! join handshake, heartbeat, and roster on top of it and drives a
//! [`ViewAdapter`].

pub mod handshake;
pub mod heartbeat;
pub mod motion;
pub mod protocol;
pub mod roster;
pub mod session;
pub mod transport;
pub mod view;
pub mod wamp;

#[cfg(test)]
pub(crate) mod testing;

pub use handshake::RetryPolicy;
pub use heartbeat::Heartbeat;
pub use motion::{Motion, MotionTransition};
pub use protocol::{InboundEvent, JoinResponse, MoveIntent, PlayerInfo};
pub use roster::{Player, PlayerStyle, Removal, Roster, RosterUpdate};
pub use session::{GameClient, SessionEvent, SessionSettings};
pub use transport::{RpcTransport, SubscriptionId, TransportEvent};
pub use view::{HeadlessView, ShapeKind, ViewAdapter, VisualHandle, VisualSpec};
pub use wamp::{WampClient, WampConfig};
