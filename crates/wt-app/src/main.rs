mod cli;
mod input;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wt_common::ConfigError;
use wt_config::WtConfig;
use wt_session::{GameClient, HeadlessView, SessionEvent, WampClient};

const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// `RUST_LOG` wins, then the flag/config directive, then the default.
fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Out-of-range values are kept; only an unreadable file falls back to
/// defaults.
fn load_config(args: &cli::Args) -> Result<WtConfig, ConfigError> {
    match &args.config {
        Some(path) => wt_config::load_from_path(path),
        None => wt_config::load_default(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Loaded before logging so the config's level can apply.
    let loaded = load_config(&args);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => WtConfig::default(),
    };
    args.apply_overrides(&mut config);

    init_logging(&config.logging.level);
    info!("walkandtalk v{} starting...", env!("CARGO_PKG_VERSION"));
    match &loaded {
        Err(e) => warn!(error = %e, "Config load failed, using defaults"),
        // The loader's own warning went out before logging was up.
        Ok(_) => {
            if let Err(e) = wt_config::validate(&config) {
                warn!(error = %e, "Config has invalid values");
            }
        }
    }

    let (transport, transport_events) = WampClient::connect(settings::wamp_config(&config));
    let (client, mut events) = GameClient::start(
        Arc::new(transport),
        transport_events,
        HeadlessView::new(),
        settings::session_settings(&config),
    );

    tokio::spawn(input::forward_stdin(client.clone()));

    let leave_client = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, leaving game");
            leave_client.leave().await;
        }
    });

    let mut joined = false;
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Connected { session_id } => {
                info!(session_id, url = %config.server.url, "Connected to router");
            }
            SessionEvent::Joining { attempt } => info!(attempt, "Joining game..."),
            SessionEvent::Joined { player_id, players } => {
                joined = true;
                info!(player = %player_id, players, "Joined game, type `x y` to move");
            }
            SessionEvent::PlayerJoined(id) => info!(player = %id, "Player joined"),
            SessionEvent::PlayerLeft(id) => info!(player = %id, "Player left"),
            SessionEvent::Ejected(id) => warn!(player = %id, "Removed from the game by the server"),
            SessionEvent::SubscriptionFailed { topic, error } => {
                warn!(topic = %topic, error = %error, "Not receiving updates for topic");
            }
            SessionEvent::Closed { reason } => {
                info!(reason = %reason, "Shutdown complete");
                break;
            }
        }
    }

    if joined {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
