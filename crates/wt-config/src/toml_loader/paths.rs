//! Where the config file lives, and writing the commented default.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use wt_common::ConfigError;

use super::template::default_config_toml;

/// Environment variable that replaces the platform default path.
pub const CONFIG_PATH_ENV: &str = "WALKANDTALK_CONFIG";

/// `$WALKANDTALK_CONFIG`, else `<config dir>/walkandtalk/config.toml`
/// (`~/.config/walkandtalk/config.toml` on Linux).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("walkandtalk").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented default config to `path`, creating parent
/// directories. An existing file is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(io_failure("create", path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_failure("write", path, e))?;

    info!(path = %path.display(), "Wrote default config");
    Ok(())
}

pub(super) fn io_failure(action: &str, path: &Path, e: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {action} {}: {e}", path.display()))
}
