//! Background WebSocket connection task for one WAMP session.
//!
//! There is no reconnect: once the connection ends a single
//! `TransportEvent::Closed` is emitted and the task exits.

use std::fmt::Display;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};
use wt_common::TransportError;

use super::handler::{handle_message, Flow, RouterState};
use super::types::{WampCommand, WampConfig, WampMessage, CLOSE_REALM, GOODBYE_AND_OUT, SUBPROTOCOL};
use crate::transport::TransportEvent;

// ---------------------------------------------------------------------------
// Connection Task
// ---------------------------------------------------------------------------

/// Run one connection from open to close.
pub(crate) async fn connection_task(
    config: WampConfig,
    event_tx: mpsc::Sender<TransportEvent>,
    mut command_rx: mpsc::Receiver<WampCommand>,
) {
    let reason = match run_session(&config, &event_tx, &mut command_rx).await {
        Ok(reason) => reason,
        Err(e) => {
            error!(error = %e, "WAMP connection failed");
            e.to_string()
        }
    };

    // Anything queued behind the close gets a definite answer.
    command_rx.close();
    while let Ok(command) = command_rx.try_recv() {
        reject(command);
    }

    info!(reason = %reason, "WAMP connection closed");
    let _ = event_tx.send(TransportEvent::Closed { reason }).await;
}

async fn run_session(
    config: &WampConfig,
    event_tx: &mpsc::Sender<TransportEvent>,
    command_rx: &mut mpsc::Receiver<WampCommand>,
) -> Result<String, TransportError> {
    info!(url = %config.url, realm = %config.realm, "Connecting to WAMP router");

    let request = build_request(&config.url)?;
    let (ws_stream, _) = tokio::time::timeout(
        config.connect_timeout,
        tokio_tungstenite::connect_async(request),
    )
    .await
    .map_err(|_| {
        TransportError::Timeout(format!("connect after {:?}", config.connect_timeout))
    })?
    .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

    let (mut ws_write, mut ws_read) = ws_stream.split();

    send(&mut ws_write, &WampMessage::hello(&config.realm)).await?;
    let session_id = tokio::time::timeout(config.connect_timeout, await_welcome(&mut ws_read))
        .await
        .map_err(|_| TransportError::Timeout("waiting for WELCOME".into()))??;

    info!(session = session_id, "WAMP session established");
    let _ = event_tx.send(TransportEvent::Connected { session_id }).await;

    let mut state = RouterState::default();
    let reason = loop {
        tokio::select! {
            incoming = ws_read.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    let msg = match decode(&text) {
                        Ok(msg) => msg,
                        Err(e) => {
                            debug!(error = %e, text = %text.as_str(), "Unrecognized message from router");
                            continue;
                        }
                    };
                    match handle_message(msg, &mut state, event_tx).await {
                        Flow::Continue => {}
                        Flow::Goodbye(reason) => {
                            let _ = send(&mut ws_write, &WampMessage::goodbye(GOODBYE_AND_OUT)).await;
                            let _ = ws_write.close().await;
                            break reason;
                        }
                        Flow::Abort(reason) => break reason,
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    info!("Router closed connection");
                    break frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|r| !r.is_empty())
                        .unwrap_or_else(|| "closed by router".to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    break format!("websocket error: {e}");
                }
                None => break "connection lost".to_string(),
            },
            command = command_rx.recv() => match command {
                Some(WampCommand::Call { procedure, args, reply }) => {
                    let request = state.next_request_id();
                    let msg = WampMessage::Call {
                        request,
                        options: json!({}),
                        procedure,
                        args,
                    };
                    match (send(&mut ws_write, &msg).await, reply) {
                        (Ok(()), Some(reply)) => state.track_call(request, reply),
                        (Ok(()), None) => {}
                        (Err(e), Some(reply)) => {
                            let _ = reply.send(Err(e));
                        }
                        (Err(e), None) => debug!(error = %e, "Dropped fire-and-forget call"),
                    }
                }
                Some(WampCommand::Subscribe { topic, reply }) => {
                    let request = state.next_request_id();
                    let msg = WampMessage::Subscribe {
                        request,
                        options: json!({}),
                        topic: topic.clone(),
                    };
                    match send(&mut ws_write, &msg).await {
                        Ok(()) => state.track_subscribe(request, topic, reply),
                        Err(e) => {
                            let _ = reply.send(Err(e));
                        }
                    }
                }
                Some(WampCommand::Disconnect) | None => {
                    let _ = send(&mut ws_write, &WampMessage::goodbye(CLOSE_REALM)).await;
                    let _ = ws_write.close().await;
                    break "client disconnect".to_string();
                }
            },
        }
    };

    state.fail_pending();
    Ok(reason)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Client request carrying the WAMP subprotocol header.
fn build_request(url: &str) -> Result<Request, TransportError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| TransportError::ConnectFailed(format!("invalid url {url}: {e}")))?;
    request
        .headers_mut()
        .insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));
    Ok(request)
}

fn decode(text: &str) -> Result<WampMessage, TransportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| TransportError::Protocol(e.to_string()))?;
    WampMessage::from_json(&value)
}

async fn send<S>(sink: &mut S, msg: &WampMessage) -> Result<(), TransportError>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    let json = msg.to_json().to_string();
    sink.send(WsMessage::Text(json.into())).await.map_err(|e| {
        warn!(error = %e, message = msg.name(), "Failed to send");
        TransportError::ConnectionClosed
    })
}

/// Wait for the router's answer to HELLO.
async fn await_welcome<S, E>(read: &mut S) -> Result<u64, TransportError>
where
    S: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = read.next().await {
        match frame.map_err(|e| TransportError::ConnectFailed(e.to_string()))? {
            WsMessage::Text(text) => {
                return match decode(&text)? {
                    WampMessage::Welcome { session, .. } => Ok(session),
                    WampMessage::Abort { reason, .. } => Err(TransportError::Aborted(reason)),
                    other => Err(TransportError::Protocol(format!(
                        "expected WELCOME, got {}",
                        other.name()
                    ))),
                };
            }
            WsMessage::Close(_) => return Err(TransportError::ConnectionClosed),
            _ => {}
        }
    }
    Err(TransportError::ConnectionClosed)
}

fn reject(command: WampCommand) {
    match command {
        WampCommand::Call {
            reply: Some(reply), ..
        } => {
            let _ = reply.send(Err(TransportError::ConnectionClosed));
        }
        WampCommand::Subscribe { reply, .. } => {
            let _ = reply.send(Err(TransportError::ConnectionClosed));
        }
        WampCommand::Call { reply: None, .. } | WampCommand::Disconnect => {}
    }
}
