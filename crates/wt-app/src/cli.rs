use std::path::PathBuf;

use clap::Parser;
use wt_config::WtConfig;

/// walkandtalk: walk around a shared stage with everyone else connected.
#[derive(Parser, Debug)]
#[command(name = "walkandtalk", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Router WebSocket URL, e.g. ws://localhost:8080/ws.
    #[arg(long)]
    pub url: Option<String>,

    /// WAMP realm to join.
    #[arg(long)]
    pub realm: Option<String>,

    /// Log filter directive (debug, info, wt_session=trace, ...).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Flags win over file values.
    pub fn apply_overrides(&self, config: &mut WtConfig) {
        if let Some(url) = &self.url {
            config.server.url = url.clone();
        }
        if let Some(realm) = &self.realm {
            config.server.realm = realm.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
