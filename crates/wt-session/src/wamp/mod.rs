//! Thin WAMP v2 client (caller + subscriber roles) over WebSocket.
//!
//! Uses `tokio-tungstenite` with the `wamp.2.json` subprotocol. One
//! background task owns the socket; `WampClient` handles talk to it
//! through a command channel.

mod client;
mod connection;
mod handler;
mod types;

pub use client::WampClient;
pub use types::{codes, WampConfig, WampMessage, SUBPROTOCOL};
