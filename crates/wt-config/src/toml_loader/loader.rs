//! Reading and parsing config files.

use std::io;
use std::path::Path;

use tracing::{debug, info, warn};
use wt_common::ConfigError;

use super::paths::{create_default_config, default_config_path, io_failure};
use crate::schema::WtConfig;
use crate::validation;

/// Parse the TOML file at `path`; absent fields take their defaults.
///
/// Out-of-range values only produce a warning here. Callers that need a
/// valid config run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<WtConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(io_failure("read", path, e)),
    };

    let config: WtConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "Config has invalid values");
    }

    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load from [`default_config_path`], writing the default file on first run.
pub fn load_default() -> Result<WtConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No config file, creating one with defaults");
            create_default_config(&path)?;
            Ok(WtConfig::default())
        }
        other => other,
    }
}
