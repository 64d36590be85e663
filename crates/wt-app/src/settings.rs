//! Config sections mapped onto transport and session settings.

use std::time::Duration;

use wt_config::WtConfig;
use wt_session::{PlayerStyle, RetryPolicy, SessionSettings, WampConfig};

pub fn wamp_config(config: &WtConfig) -> WampConfig {
    WampConfig {
        url: config.server.url.clone(),
        realm: config.server.realm.clone(),
        connect_timeout: Duration::from_secs(config.server.connect_timeout_secs),
        call_timeout: Duration::from_secs(config.server.call_timeout_secs),
    }
}

pub fn session_settings(config: &WtConfig) -> SessionSettings {
    let session = &config.session;
    let delay = Duration::from_millis(session.join_retry_delay_ms);
    let retry = match session.join_max_attempts {
        0 => RetryPolicy::unbounded(delay),
        max => RetryPolicy::bounded(delay, max),
    };

    SessionSettings {
        retry,
        heartbeat_interval: Duration::from_millis(session.heartbeat_interval_ms),
        style: PlayerStyle {
            shape: config.player.shape.clone(),
            size: config.player.size,
            speed: config.player.speed,
        },
        event_buffer: session.event_buffer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_session_defaults() {
        let config = WtConfig::default();
        assert_eq!(session_settings(&config), SessionSettings::default());

        let wamp = wamp_config(&config);
        assert_eq!(wamp.realm, "realm1");
        assert_eq!(wamp.call_timeout, Duration::from_secs(10));
        assert_eq!(wamp.connect_timeout, Duration::from_secs(15));
    }

    #[test]
    fn max_attempts_bounds_retry() {
        let mut config = WtConfig::default();
        config.session.join_max_attempts = 4;
        config.session.join_retry_delay_ms = 250;

        let settings = session_settings(&config);

        assert_eq!(
            settings.retry,
            RetryPolicy::bounded(Duration::from_millis(250), 4)
        );
    }
}
