//! Session actor: the single owner of identity, roster, and heartbeat.

use std::sync::Arc;

use futures_util::future;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use wt_common::{Point, TransportError};

use super::types::{SessionCommand, SessionEvent, SessionSettings};
use crate::handshake::{self, RetryPolicy};
use crate::heartbeat::Heartbeat;
use crate::protocol::{procedures, topics, InboundEvent, JoinResponse, MoveIntent};
use crate::roster::{Roster, RosterUpdate};
use crate::transport::{RpcTransport, SubscriptionId, TransportEvent};
use crate::view::ViewAdapter;

pub(crate) struct GameSession<T: ?Sized, V> {
    transport: Arc<T>,
    view: V,
    roster: Roster,
    heartbeat: Heartbeat,
    retry: RetryPolicy,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl<T, V> GameSession<T, V>
where
    T: RpcTransport + ?Sized,
    V: ViewAdapter,
{
    pub(crate) fn new(
        transport: Arc<T>,
        view: V,
        settings: SessionSettings,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            transport,
            view,
            roster: Roster::new(settings.style),
            heartbeat: Heartbeat::new(settings.heartbeat_interval),
            retry: settings.retry,
            event_tx,
        }
    }

    /// Drive the session to completion, then tear it down.
    pub(crate) async fn run(
        mut self,
        mut transport_rx: mpsc::Receiver<TransportEvent>,
        mut command_rx: mpsc::Receiver<SessionCommand>,
    ) {
        let reason = self.drive(&mut transport_rx, &mut command_rx).await;
        self.teardown(reason).await;
    }

    async fn drive(
        &mut self,
        transport_rx: &mut mpsc::Receiver<TransportEvent>,
        command_rx: &mut mpsc::Receiver<SessionCommand>,
    ) -> String {
        // Connect.
        loop {
            tokio::select! {
                event = transport_rx.recv() => match event {
                    Some(TransportEvent::Connected { session_id }) => {
                        self.emit(SessionEvent::Connected { session_id });
                        break;
                    }
                    Some(TransportEvent::Closed { reason }) => return reason,
                    Some(TransportEvent::Publication { topic, .. }) => {
                        debug!(topic = %topic, "Publication before connect ignored");
                    }
                    None => return "transport gone".into(),
                },
                command = command_rx.recv() => match command {
                    Some(SessionCommand::PointerDown(point)) => {
                        debug!(%point, "Pointer input before join dropped");
                    }
                    Some(SessionCommand::Leave) | None => return "left before joining".into(),
                },
            }
        }

        // Join. A close or leave cancels the retry loop.
        let response = {
            let transport = Arc::clone(&self.transport);
            let retry = self.retry;
            let event_tx = self.event_tx.clone();
            let join = handshake::join(&*transport, &retry, move |attempt| {
                let _ = event_tx.try_send(SessionEvent::Joining { attempt });
            });
            tokio::pin!(join);

            loop {
                tokio::select! {
                    result = &mut join => match result {
                        Ok(response) => break response,
                        Err(e) => {
                            error!(error = %e, "Could not join game");
                            return e.to_string();
                        }
                    },
                    event = transport_rx.recv() => match event {
                        Some(TransportEvent::Closed { reason }) => return reason,
                        Some(other) => debug!(event = ?other, "Transport event during join ignored"),
                        None => return "transport gone".into(),
                    },
                    command = command_rx.recv() => match command {
                        Some(SessionCommand::PointerDown(point)) => {
                            debug!(%point, "Pointer input before join dropped");
                        }
                        Some(SessionCommand::Leave) | None => return "left before joining".into(),
                    },
                }
            }
        };

        self.on_joined(response);

        // Subscribe. All three requests go out at once; publications on
        // topics already acknowledged are applied while the rest are in
        // flight.
        {
            let transport = Arc::clone(&self.transport);
            let subscribe = future::join_all(topics::ALL.map(|topic| transport.subscribe(topic)));
            tokio::pin!(subscribe);

            loop {
                tokio::select! {
                    results = &mut subscribe => {
                        for (topic, result) in topics::ALL.into_iter().zip(results) {
                            self.on_subscribed(topic, result);
                        }
                        break;
                    }
                    event = transport_rx.recv() => {
                        if let Some(reason) = self.on_transport_event(event) {
                            return reason;
                        }
                    }
                    command = command_rx.recv() => {
                        if let Some(reason) = self.on_command(command).await {
                            return reason;
                        }
                    }
                }
            }
        }

        // Play.
        loop {
            tokio::select! {
                event = transport_rx.recv() => {
                    if let Some(reason) = self.on_transport_event(event) {
                        return reason;
                    }
                }
                command = command_rx.recv() => {
                    if let Some(reason) = self.on_command(command).await {
                        return reason;
                    }
                }
            }
        }
    }

    /// Seed the roster and start the heartbeat. Seeding must finish before
    /// any subscription exists.
    fn on_joined(&mut self, response: JoinResponse) {
        let player_id = response.player.player_id.clone();
        self.roster.seed(&response, &mut self.view);
        self.emit(SessionEvent::Joined {
            player_id: player_id.clone(),
            players: self.roster.len(),
        });

        self.heartbeat.start(Arc::clone(&self.transport), player_id);
    }

    fn on_subscribed(&self, topic: &str, result: Result<SubscriptionId, TransportError>) {
        match result {
            Ok(subscription) => debug!(topic, subscription, "Subscribed"),
            Err(e) => {
                warn!(topic, error = %e, "Subscription failed");
                self.emit(SessionEvent::SubscriptionFailed {
                    topic: topic.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// Returns the close reason once the transport is gone.
    fn on_transport_event(&mut self, event: Option<TransportEvent>) -> Option<String> {
        match event {
            Some(TransportEvent::Publication { topic, args }) => {
                self.handle_publication(&topic, &args);
                None
            }
            Some(TransportEvent::Closed { reason }) => Some(reason),
            Some(TransportEvent::Connected { session_id }) => {
                debug!(session_id, "Unexpected second connect ignored");
                None
            }
            None => Some("transport gone".into()),
        }
    }

    /// Returns the close reason once the application leaves.
    async fn on_command(&mut self, command: Option<SessionCommand>) -> Option<String> {
        match command {
            Some(SessionCommand::PointerDown(point)) => {
                self.pointer_down(point).await;
                None
            }
            Some(SessionCommand::Leave) | None => {
                self.leave().await;
                Some("left game".into())
            }
        }
    }

    fn handle_publication(&mut self, topic: &str, args: &[serde_json::Value]) {
        let event = match InboundEvent::from_publication(topic, args) {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!(topic, "Publication on unrelated topic ignored");
                return;
            }
            Err(e) => {
                warn!(topic, error = %e, "Malformed publication dropped");
                return;
            }
        };

        for update in self.roster.apply(event, Instant::now(), &mut self.view) {
            self.emit(match update {
                RosterUpdate::Joined(id) => SessionEvent::PlayerJoined(id),
                RosterUpdate::Left(id) => SessionEvent::PlayerLeft(id),
                RosterUpdate::Ejected(id) => SessionEvent::Ejected(id),
            });
        }
    }

    /// Ask the server to move us. The shape moves on the server's echo.
    async fn pointer_down(&mut self, point: Point) {
        let Some(player_id) = self.roster.local_identity().cloned() else {
            debug!(%point, "Pointer input before join dropped");
            return;
        };
        let intent = MoveIntent {
            player_id,
            x: point.x,
            y: point.y,
        };
        match serde_json::to_value(&intent) {
            Ok(payload) => {
                self.transport
                    .notify(procedures::PLAYER_MOVED, vec![payload])
                    .await;
            }
            Err(e) => warn!(error = %e, "Cannot encode move intent"),
        }
    }

    async fn leave(&mut self) {
        if let Some(player_id) = self.roster.local_identity() {
            info!(player = %player_id, "Leaving game");
            self.transport
                .notify(procedures::LEAVE_GAME, vec![player_id.to_json()])
                .await;
        }
    }

    async fn teardown(mut self, reason: String) {
        self.heartbeat.stop();
        self.roster.clear(&mut self.view);
        self.transport.disconnect().await;

        info!(reason = %reason, "Session closed");
        let _ = self.event_tx.send(SessionEvent::Closed { reason }).await;
    }

    /// Non-blocking; a full channel drops the event.
    fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!(error = %e, "Session event dropped");
        }
    }
}
