//! The RPC/pub-sub surface the game session consumes.
//!
//! `WampClient` is the production implementation; the session only ever
//! talks to this trait so it can run against any router connection.

use async_trait::async_trait;
use serde_json::Value;
use wt_common::TransportError;

/// Router-assigned subscription id.
pub type SubscriptionId = u64;

/// Lifecycle and publication events emitted by a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Transport-level session established (below the game join).
    Connected { session_id: u64 },
    /// An event arrived on a subscribed topic.
    Publication { topic: String, args: Vec<Value> },
    /// Connection gone; every subscription is invalid from here on.
    Closed { reason: String },
}

#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Call a remote procedure and await its positional result arguments.
    async fn call(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>, TransportError>;

    /// Call a remote procedure without waiting for the reply.
    async fn notify(&self, procedure: &str, args: Vec<Value>);

    /// Subscribe to a topic. Publications surface as
    /// [`TransportEvent::Publication`].
    async fn subscribe(&self, topic: &str) -> Result<SubscriptionId, TransportError>;

    /// Close the session. A `Closed` event follows.
    async fn disconnect(&self);
}
