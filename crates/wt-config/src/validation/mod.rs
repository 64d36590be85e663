//! Full configuration validation.
//!
//! Collects every range and format problem into a single `ConfigError`.

mod helpers;


use tracing_subscriber::EnvFilter;
use wt_common::ConfigError;

use crate::schema::WtConfig;

use helpers::{validate_one_of, validate_range, validate_range_f64};

/// Visual types the view layer knows how to draw.
pub const SUPPORTED_SHAPES: &[&str] = &["circle", "rect"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WtConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_session(&mut errors, config);
    validate_player(&mut errors, config);
    validate_logging(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &WtConfig) {
    let url = &config.server.url;
    if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        errors.push(format!("server.url = {url:?} must start with ws:// or wss://"));
    }
    if config.server.realm.trim().is_empty() {
        errors.push("server.realm must not be empty".into());
    }
    validate_range(
        errors,
        "server.connect_timeout_secs",
        config.server.connect_timeout_secs,
        1,
        300,
    );
    validate_range(
        errors,
        "server.call_timeout_secs",
        config.server.call_timeout_secs,
        1,
        300,
    );
}

fn validate_session(errors: &mut Vec<String>, config: &WtConfig) {
    validate_range(
        errors,
        "session.join_retry_delay_ms",
        config.session.join_retry_delay_ms,
        10,
        60_000,
    );
    validate_range(
        errors,
        "session.heartbeat_interval_ms",
        config.session.heartbeat_interval_ms,
        100,
        60_000,
    );
    validate_range(
        errors,
        "session.event_buffer",
        config.session.event_buffer as u64,
        1,
        65_536,
    );
}

fn validate_player(errors: &mut Vec<String>, config: &WtConfig) {
    validate_one_of(errors, "player.shape", &config.player.shape, SUPPORTED_SHAPES);
    validate_range_f64(errors, "player.size", config.player.size, 1.0, 500.0);
    validate_range_f64(errors, "player.speed", config.player.speed, 1.0, 100_000.0);
}

/// `logging.level` takes the same directive syntax as `RUST_LOG`.
fn validate_logging(errors: &mut Vec<String>, config: &WtConfig) {
    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        errors.push(format!(
            "logging.level = {:?} is not a valid filter directive: {e}",
            config.logging.level
        ));
    }
}
