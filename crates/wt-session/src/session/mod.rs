//! The owned game session: one actor task holding identity, roster,
//! heartbeat, and the view, driven by transport events and commands.

mod actor;
mod client;
mod types;

pub use client::GameClient;
pub use types::{SessionEvent, SessionSettings};
