//! Configuration, WAMP message codec, and the command enum for the router client.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::oneshot;
use wt_common::TransportError;

use crate::transport::SubscriptionId;

/// WebSocket subprotocol for WAMP v2 with JSON serialization.
pub const SUBPROTOCOL: &str = "wamp.2.json";

/// GOODBYE reason sent when the client leaves.
pub const CLOSE_REALM: &str = "wamp.close.close_realm";

/// GOODBYE reason sent in reply to a router-initiated GOODBYE.
pub const GOODBYE_AND_OUT: &str = "wamp.close.goodbye_and_out";

/// WAMP message type codes used by a caller/subscriber client.
pub mod codes {
    pub const HELLO: u64 = 1;
    pub const WELCOME: u64 = 2;
    pub const ABORT: u64 = 3;
    pub const GOODBYE: u64 = 6;
    pub const ERROR: u64 = 8;
    pub const SUBSCRIBE: u64 = 32;
    pub const SUBSCRIBED: u64 = 33;
    pub const EVENT: u64 = 36;
    pub const CALL: u64 = 48;
    pub const RESULT: u64 = 50;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to a WAMP router.
#[derive(Debug, Clone)]
pub struct WampConfig {
    /// WebSocket URL, e.g. `ws://localhost:8080/ws`.
    pub url: String,
    pub realm: String,
    /// Bound on the WebSocket handshake and on waiting for WELCOME.
    pub connect_timeout: Duration,
    /// Bound on awaited calls and subscriptions.
    pub call_timeout: Duration,
}

impl Default for WampConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080/ws".into(),
            realm: "realm1".into(),
            connect_timeout: Duration::from_secs(15),
            call_timeout: Duration::from_secs(10),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A WAMP message, JSON-serialized as a positional array.
#[derive(Debug, Clone, PartialEq)]
pub enum WampMessage {
    Hello {
        realm: String,
        details: Value,
    },
    Welcome {
        session: u64,
        details: Value,
    },
    Abort {
        details: Value,
        reason: String,
    },
    Goodbye {
        details: Value,
        reason: String,
    },
    Error {
        request_type: u64,
        request: u64,
        details: Value,
        error: String,
        args: Vec<Value>,
    },
    Subscribe {
        request: u64,
        options: Value,
        topic: String,
    },
    Subscribed {
        request: u64,
        subscription: SubscriptionId,
    },
    Event {
        subscription: SubscriptionId,
        publication: u64,
        details: Value,
        args: Vec<Value>,
    },
    Call {
        request: u64,
        options: Value,
        procedure: String,
        args: Vec<Value>,
    },
    Result {
        request: u64,
        details: Value,
        args: Vec<Value>,
    },
    /// A message type this client has no role for.
    Other { code: u64 },
}

impl WampMessage {
    /// HELLO announcing the caller and subscriber roles.
    pub fn hello(realm: &str) -> Self {
        Self::Hello {
            realm: realm.to_string(),
            details: json!({
                "agent": concat!("walkandtalk/", env!("CARGO_PKG_VERSION")),
                "roles": {
                    "caller": {},
                    "subscriber": {}
                }
            }),
        }
    }

    pub fn goodbye(reason: &str) -> Self {
        Self::Goodbye {
            details: json!({}),
            reason: reason.to_string(),
        }
    }

    /// Short uppercase name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hello { .. } => "HELLO",
            Self::Welcome { .. } => "WELCOME",
            Self::Abort { .. } => "ABORT",
            Self::Goodbye { .. } => "GOODBYE",
            Self::Error { .. } => "ERROR",
            Self::Subscribe { .. } => "SUBSCRIBE",
            Self::Subscribed { .. } => "SUBSCRIBED",
            Self::Event { .. } => "EVENT",
            Self::Call { .. } => "CALL",
            Self::Result { .. } => "RESULT",
            Self::Other { .. } => "OTHER",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Hello { realm, details } => json!([codes::HELLO, realm, details]),
            Self::Welcome { session, details } => json!([codes::WELCOME, session, details]),
            Self::Abort { details, reason } => json!([codes::ABORT, details, reason]),
            Self::Goodbye { details, reason } => json!([codes::GOODBYE, details, reason]),
            Self::Error {
                request_type,
                request,
                details,
                error,
                args,
            } => with_args(
                vec![
                    json!(codes::ERROR),
                    json!(request_type),
                    json!(request),
                    details.clone(),
                    json!(error),
                ],
                args,
            ),
            Self::Subscribe {
                request,
                options,
                topic,
            } => json!([codes::SUBSCRIBE, request, options, topic]),
            Self::Subscribed {
                request,
                subscription,
            } => json!([codes::SUBSCRIBED, request, subscription]),
            Self::Event {
                subscription,
                publication,
                details,
                args,
            } => with_args(
                vec![
                    json!(codes::EVENT),
                    json!(subscription),
                    json!(publication),
                    details.clone(),
                ],
                args,
            ),
            Self::Call {
                request,
                options,
                procedure,
                args,
            } => json!([codes::CALL, request, options, procedure, args]),
            Self::Result {
                request,
                details,
                args,
            } => with_args(
                vec![json!(codes::RESULT), json!(request), details.clone()],
                args,
            ),
            Self::Other { code } => json!([code]),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, TransportError> {
        let arr = value
            .as_array()
            .ok_or_else(|| TransportError::Protocol("message is not an array".into()))?;
        let code = id_at(arr, 0, "message type")?;

        let msg = match code {
            codes::HELLO => Self::Hello {
                realm: str_at(arr, 1, "realm")?,
                details: dict_at(arr, 2),
            },
            codes::WELCOME => Self::Welcome {
                session: id_at(arr, 1, "session")?,
                details: dict_at(arr, 2),
            },
            codes::ABORT => Self::Abort {
                details: dict_at(arr, 1),
                reason: str_at(arr, 2, "reason")?,
            },
            codes::GOODBYE => Self::Goodbye {
                details: dict_at(arr, 1),
                reason: str_at(arr, 2, "reason")?,
            },
            codes::ERROR => Self::Error {
                request_type: id_at(arr, 1, "request type")?,
                request: id_at(arr, 2, "request")?,
                details: dict_at(arr, 3),
                error: str_at(arr, 4, "error")?,
                args: args_at(arr, 5),
            },
            codes::SUBSCRIBE => Self::Subscribe {
                request: id_at(arr, 1, "request")?,
                options: dict_at(arr, 2),
                topic: str_at(arr, 3, "topic")?,
            },
            codes::SUBSCRIBED => Self::Subscribed {
                request: id_at(arr, 1, "request")?,
                subscription: id_at(arr, 2, "subscription")?,
            },
            codes::EVENT => Self::Event {
                subscription: id_at(arr, 1, "subscription")?,
                publication: id_at(arr, 2, "publication")?,
                details: dict_at(arr, 3),
                args: args_at(arr, 4),
            },
            codes::CALL => Self::Call {
                request: id_at(arr, 1, "request")?,
                options: dict_at(arr, 2),
                procedure: str_at(arr, 3, "procedure")?,
                args: args_at(arr, 4),
            },
            codes::RESULT => Self::Result {
                request: id_at(arr, 1, "request")?,
                details: dict_at(arr, 2),
                args: args_at(arr, 3),
            },
            other => Self::Other { code: other },
        };
        Ok(msg)
    }
}

fn with_args(mut fields: Vec<Value>, args: &[Value]) -> Value {
    if !args.is_empty() {
        fields.push(Value::Array(args.to_vec()));
    }
    Value::Array(fields)
}

fn id_at(arr: &[Value], idx: usize, what: &str) -> Result<u64, TransportError> {
    arr.get(idx)
        .and_then(Value::as_u64)
        .ok_or_else(|| TransportError::Protocol(format!("missing or invalid {what}")))
}

fn str_at(arr: &[Value], idx: usize, what: &str) -> Result<String, TransportError> {
    arr.get(idx)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TransportError::Protocol(format!("missing or invalid {what}")))
}

fn dict_at(arr: &[Value], idx: usize) -> Value {
    arr.get(idx)
        .filter(|v| v.is_object())
        .cloned()
        .unwrap_or_else(|| json!({}))
}

fn args_at(arr: &[Value], idx: usize) -> Vec<Value> {
    arr.get(idx)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub(crate) type CallReply = oneshot::Sender<Result<Vec<Value>, TransportError>>;
pub(crate) type SubscribeReply = oneshot::Sender<Result<SubscriptionId, TransportError>>;

/// Commands sent to the connection task from client handles.
#[derive(Debug)]
pub(crate) enum WampCommand {
    /// `reply: None` makes the call fire-and-forget.
    Call {
        procedure: String,
        args: Vec<Value>,
        reply: Option<CallReply>,
    },
    Subscribe {
        topic: String,
        reply: SubscribeReply,
    },
    Disconnect,
}
