//! Public handle for interacting with the WAMP connection.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use wt_common::TransportError;

use super::connection::connection_task;
use super::types::{WampCommand, WampConfig};
use crate::transport::{RpcTransport, SubscriptionId, TransportEvent};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Handle for interacting with the WAMP connection.
///
/// Cloning yields another handle to the same connection.
#[derive(Clone)]
pub struct WampClient {
    command_tx: mpsc::Sender<WampCommand>,
    call_timeout: Duration,
}

impl WampClient {
    /// Create a new client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: WampConfig) -> (Self, mpsc::Receiver<TransportEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);

        let client = Self {
            command_tx,
            call_timeout: config.call_timeout,
        };

        tokio::spawn(connection_task(config, event_tx, command_rx));

        (client, event_rx)
    }

    async fn await_reply<T>(
        &self,
        what: String,
        rx: oneshot::Receiver<Result<T, TransportError>>,
    ) -> Result<T, TransportError> {
        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(TransportError::ConnectionClosed),
            Err(_) => Err(TransportError::Timeout(what)),
        }
    }
}

#[async_trait]
impl RpcTransport for WampClient {
    async fn call(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>, TransportError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(WampCommand::Call {
                procedure: procedure.to_string(),
                args,
                reply: Some(reply),
            })
            .await
            .map_err(|_| TransportError::ConnectionClosed)?;
        self.await_reply(format!("call {procedure}"), rx).await
    }

    async fn notify(&self, procedure: &str, args: Vec<Value>) {
        let sent = self
            .command_tx
            .send(WampCommand::Call {
                procedure: procedure.to_string(),
                args,
                reply: None,
            })
            .await;
        if sent.is_err() {
            debug!(procedure = %procedure, "Connection gone, call not sent");
        }
    }

    async fn subscribe(&self, topic: &str) -> Result<SubscriptionId, TransportError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(WampCommand::Subscribe {
                topic: topic.to_string(),
                reply,
            })
            .await
            .map_err(|_| TransportError::ConnectionClosed)?;
        self.await_reply(format!("subscribe {topic}"), rx).await
    }

    async fn disconnect(&self) {
        let _ = self.command_tx.send(WampCommand::Disconnect).await;
    }
}
