use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the pub/sub RPC transport.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    #[error("session aborted by router: {0}")]
    Aborted(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("timed out: {0}")]
    Timeout(String),

    /// The router or callee answered with a WAMP ERROR.
    #[error("remote error: {0}")]
    Remote(String),

    #[error("protocol violation: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("unsupported shape type: {0}")]
    UnsupportedShape(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WtError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("join failed after {attempts} attempts: {source}")]
    JoinFailed {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("malformed payload: {0}")]
    Payload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("player.speed out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: player.speed out of range"
        );
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::Aborted("wamp.error.no_such_realm".into());
        assert_eq!(
            err.to_string(),
            "session aborted by router: wamp.error.no_such_realm"
        );

        let err = TransportError::Remote("wamp.error.no_such_procedure".into());
        assert_eq!(err.to_string(), "remote error: wamp.error.no_such_procedure");

        assert_eq!(TransportError::ConnectionClosed.to_string(), "connection closed");
    }

    #[test]
    fn view_error_display() {
        let err = ViewError::UnsupportedShape("hexagon".into());
        assert_eq!(err.to_string(), "unsupported shape type: hexagon");
    }

    #[test]
    fn wt_error_from_transport() {
        let err: WtError = TransportError::Timeout("call join_game".into()).into();
        assert!(matches!(err, WtError::Transport(_)));
        assert!(err.to_string().contains("call join_game"));
    }

    #[test]
    fn wt_error_from_view() {
        let err: WtError = ViewError::UnsupportedShape("star".into()).into();
        assert!(matches!(err, WtError::View(_)));
        assert!(err.to_string().contains("star"));
    }

    #[test]
    fn wt_error_from_config() {
        let err: WtError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, WtError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn join_failed_keeps_source() {
        use std::error::Error;

        let err = WtError::JoinFailed {
            attempts: 3,
            source: TransportError::ConnectionClosed,
        };
        assert_eq!(
            err.to_string(),
            "join failed after 3 attempts: connection closed"
        );
        assert!(err.source().is_some());
    }
}
