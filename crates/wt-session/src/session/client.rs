//! Public handle to a running game session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;
use wt_common::Point;

use super::actor::GameSession;
use super::types::{SessionCommand, SessionEvent, SessionSettings};
use crate::transport::{RpcTransport, TransportEvent};
use crate::view::ViewAdapter;

/// Handle for feeding input into a running session.
///
/// Dropping every handle makes the session leave the game and close.
#[derive(Clone)]
pub struct GameClient {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl GameClient {
    /// Spawn the session actor on top of an already-connecting transport.
    /// Returns `(client, event_receiver)`.
    pub fn start<T, V>(
        transport: Arc<T>,
        transport_events: mpsc::Receiver<TransportEvent>,
        view: V,
        settings: SessionSettings,
    ) -> (Self, mpsc::Receiver<SessionEvent>)
    where
        T: RpcTransport + ?Sized,
        V: ViewAdapter,
    {
        let (event_tx, event_rx) = mpsc::channel(settings.event_buffer.max(1));
        let (command_tx, command_rx) = mpsc::channel(64);

        let session = GameSession::new(transport, view, settings, event_tx);
        tokio::spawn(session.run(transport_events, command_rx));

        (Self { command_tx }, event_rx)
    }

    /// Forward a pointer-down coordinate. Ignored until the join completes.
    pub async fn pointer_down(&self, point: Point) {
        if self
            .command_tx
            .send(SessionCommand::PointerDown(point))
            .await
            .is_err()
        {
            debug!(%point, "Session closed, pointer input dropped");
        }
    }

    /// Leave the game and close the session.
    pub async fn leave(&self) {
        let _ = self.command_tx.send(SessionCommand::Leave).await;
    }

    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }
}
