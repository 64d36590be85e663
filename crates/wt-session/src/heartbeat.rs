//! Periodic liveness signal for the joined player.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};
use wt_common::PlayerId;

use crate::protocol::procedures;
use crate::transport::RpcTransport;

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(5000);

/// Owns at most one heartbeat task. Dropping the manager stops it.
#[derive(Debug)]
pub struct Heartbeat {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl Heartbeat {
    /// A zero interval is not a valid tick period and falls back to the
    /// default.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            warn!("Zero heartbeat interval, using default");
            DEFAULT_HEARTBEAT_INTERVAL
        } else {
            interval
        };
        Self {
            interval,
            task: None,
        }
    }

    /// (Re)start beating for `player`. Any running beat is cancelled first.
    /// The first beat goes out one interval from now.
    pub fn start<T>(&mut self, transport: Arc<T>, player: PlayerId)
    where
        T: RpcTransport + ?Sized,
    {
        self.stop();

        let period = self.interval;
        debug!(player = %player, ms = period.as_millis() as u64, "Heartbeat started");
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!(player = %player, "Heartbeat");
                transport
                    .notify(procedures::HEARTBEAT, vec![player.to_json()])
                    .await;
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Heartbeat stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_INTERVAL)
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}
