//! Incoming WAMP message handler and per-connection request bookkeeping.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wt_common::TransportError;

use super::types::{codes, CallReply, SubscribeReply, WampMessage};
use crate::transport::{SubscriptionId, TransportEvent};

// ---------------------------------------------------------------------------
// Router State
// ---------------------------------------------------------------------------

/// Outstanding requests and live subscriptions of one connection.
#[derive(Default)]
pub(crate) struct RouterState {
    last_request: u64,
    pub(crate) pending_calls: HashMap<u64, CallReply>,
    pub(crate) pending_subscribes: HashMap<u64, (String, SubscribeReply)>,
    pub(crate) subscriptions: HashMap<SubscriptionId, String>,
}

impl RouterState {
    /// Request ids are scoped to the session and start at 1.
    pub(crate) fn next_request_id(&mut self) -> u64 {
        self.last_request += 1;
        self.last_request
    }

    /// Register an outgoing CALL. Callers that gave up waiting (timed out)
    /// have dropped their receiver; those entries are pruned here.
    pub(crate) fn track_call(&mut self, request: u64, reply: CallReply) {
        self.pending_calls.retain(|_, reply| !reply.is_closed());
        self.pending_calls.insert(request, reply);
    }

    pub(crate) fn track_subscribe(&mut self, request: u64, topic: String, reply: SubscribeReply) {
        self.pending_subscribes.retain(|_, (_, reply)| !reply.is_closed());
        self.pending_subscribes.insert(request, (topic, reply));
    }

    /// Resolve everything still in flight with `ConnectionClosed`.
    pub(crate) fn fail_pending(&mut self) {
        for (_, reply) in self.pending_calls.drain() {
            let _ = reply.send(Err(TransportError::ConnectionClosed));
        }
        for (_, (_, reply)) in self.pending_subscribes.drain() {
            let _ = reply.send(Err(TransportError::ConnectionClosed));
        }
        self.subscriptions.clear();
    }
}

/// What the connection loop should do after a message was handled.
#[derive(Debug, PartialEq)]
pub(crate) enum Flow {
    Continue,
    /// Router sent GOODBYE; answer and close.
    Goodbye(String),
    /// Router aborted the session.
    Abort(String),
}

// ---------------------------------------------------------------------------
// Message Handler
// ---------------------------------------------------------------------------

/// Handle a single incoming WAMP message on an established session.
pub(crate) async fn handle_message(
    msg: WampMessage,
    state: &mut RouterState,
    event_tx: &mpsc::Sender<TransportEvent>,
) -> Flow {
    match msg {
        WampMessage::Result { request, args, .. } => {
            match state.pending_calls.remove(&request) {
                Some(reply) => {
                    let _ = reply.send(Ok(args));
                }
                // Fire-and-forget calls are never registered.
                None => debug!(request, "Result for untracked call"),
            }
        }
        WampMessage::Error {
            request_type,
            request,
            error,
            args,
            ..
        } => {
            let failure = TransportError::Remote(describe_error(&error, &args));
            match request_type {
                codes::CALL => match state.pending_calls.remove(&request) {
                    Some(reply) => {
                        let _ = reply.send(Err(failure));
                    }
                    None => debug!(request, error = %error, "Error for untracked call"),
                },
                codes::SUBSCRIBE => match state.pending_subscribes.remove(&request) {
                    Some((topic, reply)) => {
                        warn!(topic = %topic, error = %error, "Subscribe rejected");
                        let _ = reply.send(Err(failure));
                    }
                    None => debug!(request, error = %error, "Error for untracked subscribe"),
                },
                other => debug!(request_type = other, error = %error, "Unhandled ERROR"),
            }
        }
        WampMessage::Subscribed {
            request,
            subscription,
        } => match state.pending_subscribes.remove(&request) {
            Some((topic, reply)) => {
                debug!(topic = %topic, subscription, "Subscribed");
                state.subscriptions.insert(subscription, topic);
                let _ = reply.send(Ok(subscription));
            }
            None => debug!(request, "SUBSCRIBED for untracked request"),
        },
        WampMessage::Event {
            subscription, args, ..
        } => match state.subscriptions.get(&subscription) {
            Some(topic) => {
                debug!(topic = %topic, "Event received");
                let _ = event_tx
                    .send(TransportEvent::Publication {
                        topic: topic.clone(),
                        args,
                    })
                    .await;
            }
            None => debug!(subscription, "Event for unknown subscription"),
        },
        WampMessage::Goodbye { reason, .. } => {
            info!(reason = %reason, "Router said goodbye");
            return Flow::Goodbye(reason);
        }
        WampMessage::Abort { reason, .. } => {
            warn!(reason = %reason, "Router aborted session");
            return Flow::Abort(reason);
        }
        other => {
            debug!(message = other.name(), "Unhandled WAMP message");
        }
    }
    Flow::Continue
}

/// `error` URI plus the first string argument, if any.
fn describe_error(error: &str, args: &[Value]) -> String {
    match args.first().and_then(Value::as_str) {
        Some(detail) => format!("{error}: {detail}"),
        None => error.to_string(),
    }
}
