//! Game wire protocol: procedure and topic names, payload types, and
//! decoding of publications into roster events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wt_common::{PlayerId, Point, WtError};

/// Remote procedures registered by the game server.
pub mod procedures {
    pub const JOIN_GAME: &str = "at.theduke.wt.join_game";
    pub const HEARTBEAT: &str = "at.theduke.wt.heartbeat";
    pub const PLAYER_MOVED: &str = "at.theduke.wt.player_moved";
    pub const LEAVE_GAME: &str = "at.theduke.wt.leave_game";
}

/// Topics the game server publishes on.
pub mod topics {
    pub const PLAYERS_JOINED: &str = "at.theduke.wt.players_joined";
    pub const PLAYERS_LEFT: &str = "at.theduke.wt.players_left";
    pub const PLAYER_POSITIONS: &str = "at.theduke.wt.player_positions";

    /// Subscribed right after the roster is seeded, in this order.
    pub const ALL: [&str; 3] = [PLAYERS_JOINED, PLAYERS_LEFT, PLAYER_POSITIONS];
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A player as described by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub player_id: PlayerId,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub pos_x: f64,
    #[serde(default)]
    pub pos_y: f64,
}

impl PlayerInfo {
    pub fn position(&self) -> Point {
        Point::new(self.pos_x, self.pos_y)
    }
}

/// Players arrive either keyed by id or as a plain list.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlayerList {
    Map(BTreeMap<String, PlayerInfo>),
    List(Vec<PlayerInfo>),
}

impl PlayerList {
    fn into_vec(self) -> Vec<PlayerInfo> {
        match self {
            Self::Map(map) => map.into_values().collect(),
            Self::List(list) => list,
        }
    }
}

#[derive(Deserialize)]
struct RawJoinResponse {
    player: PlayerInfo,
    #[serde(default)]
    players: Option<PlayerList>,
}

/// Reply to `join_game`: our own player plus everyone currently connected.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinResponse {
    pub player: PlayerInfo,
    pub players: Vec<PlayerInfo>,
}

impl JoinResponse {
    /// Decode from the call's positional result arguments.
    pub fn from_args(args: &[Value]) -> Result<Self, WtError> {
        let payload = args
            .first()
            .ok_or_else(|| WtError::Payload("join_game: empty result".into()))?;
        let raw = RawJoinResponse::deserialize(payload)
            .map_err(|e| WtError::Payload(format!("join_game: {e}")))?;
        Ok(Self {
            player: raw.player,
            players: raw.players.map(PlayerList::into_vec).unwrap_or_default(),
        })
    }
}

/// Outbound movement intent for the local player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveIntent {
    pub player_id: PlayerId,
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// Inbound Events
// ---------------------------------------------------------------------------

/// A roster-mutating event decoded from a publication.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Joined(Vec<PlayerInfo>),
    Left(Vec<PlayerId>),
    /// Targets keyed by the raw object key; the roster resolves each key
    /// against the ids it knows.
    PositionUpdate(Vec<(String, Point)>),
}

impl InboundEvent {
    /// Decode a publication. Returns `Ok(None)` for topics that carry no
    /// roster events.
    pub fn from_publication(topic: &str, args: &[Value]) -> Result<Option<Self>, WtError> {
        let payload = || {
            args.first()
                .ok_or_else(|| WtError::Payload(format!("{topic}: missing payload")))
        };
        let malformed = |e: serde_json::Error| WtError::Payload(format!("{topic}: {e}"));

        let event = match topic {
            topics::PLAYERS_JOINED => {
                let players = PlayerList::deserialize(payload()?).map_err(malformed)?;
                Self::Joined(players.into_vec())
            }
            topics::PLAYERS_LEFT => {
                let ids = Vec::<PlayerId>::deserialize(payload()?).map_err(malformed)?;
                Self::Left(ids)
            }
            topics::PLAYER_POSITIONS => {
                let positions =
                    BTreeMap::<String, [f64; 2]>::deserialize(payload()?).map_err(malformed)?;
                Self::PositionUpdate(
                    positions
                        .into_iter()
                        .map(|(key, pos)| (key, Point::from(pos)))
                        .collect(),
                )
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}
