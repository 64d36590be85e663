use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Server-assigned player identifier.
///
/// The reference server hands out integers, but ids are opaque to the
/// client. Any JSON number or string is accepted and its JSON shape is
/// preserved, so ids echoed back in heartbeats and move intents compare
/// equal on the server side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    Num(Number),
    Str(String),
}

impl PlayerId {
    /// Ids an object key may stand for, string form first.
    ///
    /// Object keys are always strings on the wire, so `"7"` may name either
    /// the string id `"7"` or the numeric id `7`. Callers pick the first
    /// candidate they actually know.
    pub fn key_candidates(key: &str) -> impl Iterator<Item = PlayerId> {
        let numeric = key.parse::<Number>().ok().map(Self::Num);
        std::iter::once(Self::Str(key.to_string())).chain(numeric)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Num(n) => serde_json::Value::Number(n.clone()),
            Self::Str(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl From<u64> for PlayerId {
    fn from(n: u64) -> Self {
        Self::Num(n.into())
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}
