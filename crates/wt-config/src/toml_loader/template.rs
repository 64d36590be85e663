//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# walkandtalk configuration
# Only override what you want to change -- missing fields use defaults.

[server]
url = "ws://localhost:8080/ws"
realm = "realm1"
# connect_timeout_secs = 15   # 1-300
# call_timeout_secs = 10      # 1-300

[session]
# join_retry_delay_ms = 1000  # 10-60000
# join_max_attempts = 0       # 0 = retry forever
# heartbeat_interval_ms = 5000  # 100-60000
# event_buffer = 256          # 1-65536

[player]
# shape = "circle"            # circle, rect
# size = 10.0                 # 1.0-500.0
# speed = 600.0               # 1.0-100000.0

[logging]
# level = "info"              # RUST_LOG syntax, e.g. "info,wt_session=debug"
"##
}
