//! In-memory doubles for the transport and the view.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Instant;
use wt_common::{Point, TransportError, ViewError};

use crate::protocol::procedures;
use crate::transport::{RpcTransport, SubscriptionId};
use crate::view::{ViewAdapter, VisualHandle, VisualSpec};

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub procedure: String,
    pub args: Vec<Value>,
    pub at: Instant,
    /// `false` for fire-and-forget calls.
    pub awaited: bool,
}

#[derive(Default)]
struct FakeState {
    join_replies: VecDeque<Result<Vec<Value>, TransportError>>,
    failing_topics: HashSet<String>,
    calls: Vec<RecordedCall>,
    subscriptions: Vec<String>,
    subscribe_delay: Duration,
    disconnects: usize,
}

/// Scripted transport: `join_game` answers come from a queue, every other
/// call succeeds with no result.
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<FakeState>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_join_reply(&self, reply: Result<Vec<Value>, TransportError>) {
        self.state.lock().unwrap().join_replies.push_back(reply);
    }

    pub fn fail_subscribe(&self, topic: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_topics
            .insert(topic.to_string());
    }

    /// Subscribe requests are recorded at once but answered after `delay`.
    pub fn delay_subscribes(&self, delay: Duration) {
        self.state.lock().unwrap().subscribe_delay = delay;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, procedure: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.procedure == procedure)
            .collect()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.state.lock().unwrap().subscriptions.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    fn record(&self, procedure: &str, args: Vec<Value>, awaited: bool) {
        self.state.lock().unwrap().calls.push(RecordedCall {
            procedure: procedure.to_string(),
            args,
            at: Instant::now(),
            awaited,
        });
    }
}

#[async_trait]
impl RpcTransport for FakeTransport {
    async fn call(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>, TransportError> {
        self.record(procedure, args, true);
        if procedure != procedures::JOIN_GAME {
            return Ok(Vec::new());
        }
        self.state
            .lock()
            .unwrap()
            .join_replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Remote("no scripted reply".into())))
    }

    async fn notify(&self, procedure: &str, args: Vec<Value>) {
        self.record(procedure, args, false);
    }

    async fn subscribe(&self, topic: &str) -> Result<SubscriptionId, TransportError> {
        let (result, delay) = {
            let mut state = self.state.lock().unwrap();
            let result = if state.failing_topics.contains(topic) {
                Err(TransportError::Remote(format!("wamp.error.not_authorized: {topic}")))
            } else {
                state.subscriptions.push(topic.to_string());
                Ok(state.subscriptions.len() as SubscriptionId)
            };
            (result, state.subscribe_delay)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn disconnect(&self) {
        self.state.lock().unwrap().disconnects += 1;
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Create {
        handle: VisualHandle,
        spec: VisualSpec,
    },
    Animate {
        handle: VisualHandle,
        target: Point,
        duration: Duration,
    },
    Destroy(VisualHandle),
}

/// View that records every call. Clones share one log, so a test can keep
/// a copy while the session owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    log: Arc<Mutex<Vec<ViewCall>>>,
    next_handle: Arc<Mutex<u64>>,
    reject_creates: bool,
}

impl RecordingView {
    /// A view whose `create_visual` always fails.
    pub fn rejecting() -> Self {
        Self {
            reject_creates: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.log.lock().unwrap().clone()
    }

    pub fn created(&self) -> usize {
        self.count(|c| matches!(c, ViewCall::Create { .. }))
    }

    pub fn destroyed(&self) -> usize {
        self.count(|c| matches!(c, ViewCall::Destroy(_)))
    }

    pub fn animations(&self) -> Vec<(VisualHandle, Point, Duration)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::Animate {
                    handle,
                    target,
                    duration,
                } => Some((handle, target, duration)),
                _ => None,
            })
            .collect()
    }

    fn count(&self, f: impl Fn(&ViewCall) -> bool) -> usize {
        self.log.lock().unwrap().iter().filter(|c| f(c)).count()
    }
}

impl ViewAdapter for RecordingView {
    fn create_visual(&mut self, spec: &VisualSpec) -> Result<VisualHandle, ViewError> {
        if self.reject_creates {
            return Err(ViewError::UnsupportedShape(spec.kind.to_string()));
        }
        let handle = {
            let mut next = self.next_handle.lock().unwrap();
            *next += 1;
            VisualHandle(*next)
        };
        self.log.lock().unwrap().push(ViewCall::Create {
            handle,
            spec: spec.clone(),
        });
        Ok(handle)
    }

    fn animate(&mut self, handle: VisualHandle, target: Point, duration: Duration) {
        self.log.lock().unwrap().push(ViewCall::Animate {
            handle,
            target,
            duration,
        });
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        self.log.lock().unwrap().push(ViewCall::Destroy(handle));
    }
}

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

pub fn player_json(id: u64, color: &str, x: f64, y: f64) -> Value {
    json!({"playerId": id, "color": color, "posX": x, "posY": y})
}

/// `join_game` result arguments in the reference server's shape: `players`
/// keyed by stringified id.
pub fn join_reply(player: Value, others: &[Value]) -> Vec<Value> {
    let mut players = serde_json::Map::new();
    for p in others.iter().chain(std::iter::once(&player)) {
        players.insert(p["playerId"].to_string(), p.clone());
    }
    vec![json!({"player": player, "players": players})]
}
