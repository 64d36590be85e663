//! Registration handshake: the `join_game` call with fixed-delay retry.

use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};
use wt_common::{TransportError, WtError};

use crate::protocol::{procedures, JoinResponse};
use crate::transport::RpcTransport;

/// When and how often a failed join is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn bounded(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: Some(max_attempts),
        }
    }

    /// Whether attempt number `attempt` (1-based) may run.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt <= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_millis(1000))
    }
}

/// Join the game, retrying until it succeeds or `policy` gives up.
///
/// Attempts are strictly sequential. `on_attempt` sees each attempt number
/// before its call goes out. A reply that cannot be decoded counts as a
/// failed attempt. Dropping the future cancels the loop.
pub async fn join<T, F>(
    transport: &T,
    policy: &RetryPolicy,
    mut on_attempt: F,
) -> Result<JoinResponse, WtError>
where
    T: RpcTransport + ?Sized,
    F: FnMut(u32),
{
    let mut attempt = 1;
    loop {
        on_attempt(attempt);

        let failure = match transport.call(procedures::JOIN_GAME, vec![json!({})]).await {
            Ok(args) => match JoinResponse::from_args(&args) {
                Ok(response) => {
                    info!(
                        player = %response.player.player_id,
                        players = response.players.len(),
                        attempt,
                        "Joined game"
                    );
                    return Ok(response);
                }
                Err(e) => TransportError::Protocol(e.to_string()),
            },
            Err(e) => e,
        };

        if !policy.allows(attempt + 1) {
            warn!(attempt, error = %failure, "Join failed, giving up");
            return Err(WtError::JoinFailed {
                attempts: attempt,
                source: failure,
            });
        }

        warn!(
            attempt,
            error = %failure,
            retry_ms = policy.delay.as_millis() as u64,
            "Join failed, retrying"
        );
        tokio::time::sleep(policy.delay).await;
        attempt += 1;
    }
}
