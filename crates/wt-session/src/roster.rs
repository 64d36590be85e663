//! Local player registry: PlayerId to movement state and visual.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use wt_common::{Color, PlayerId, Point, ViewError};

use crate::motion::{Motion, MotionTransition};
use crate::protocol::{InboundEvent, JoinResponse, PlayerInfo};
use crate::view::{ShapeKind, ViewAdapter, VisualHandle, VisualSpec};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How players are drawn and how fast they move.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStyle {
    /// Shape name handed to the view; parsed when a visual is created.
    pub shape: String,
    pub size: f64,
    /// Units per second.
    pub speed: f64,
}

impl Default for PlayerStyle {
    fn default() -> Self {
        Self {
            shape: "circle".into(),
            size: 10.0,
            speed: 600.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    color: Color,
    speed: f64,
    visual: VisualHandle,
    motion: Motion,
}

impl Player {
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    pub fn position_at(&self, now: Instant) -> Point {
        self.motion.position_at(now)
    }

    pub fn destination(&self) -> Point {
        self.motion.destination()
    }

    pub fn transition(&self, now: Instant) -> Option<&MotionTransition> {
        self.motion.transition(now)
    }
}

/// Outcome of removing a known player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The removed player was us.
    Ejected,
}

/// Membership change produced by an [`InboundEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterUpdate {
    Joined(PlayerId),
    Left(PlayerId),
    Ejected(PlayerId),
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Every mutation is a no-op until the local identity is known.
#[derive(Debug, Default)]
pub struct Roster {
    style: PlayerStyle,
    local: Option<PlayerId>,
    players: HashMap<PlayerId, Player>,
}

impl Roster {
    pub fn new(style: PlayerStyle) -> Self {
        Self {
            style,
            local: None,
            players: HashMap::new(),
        }
    }

    /// Set the server-assigned identity. Only the first call has effect.
    pub fn set_local_identity(&mut self, id: PlayerId) -> bool {
        if let Some(current) = &self.local {
            warn!(current = %current, rejected = %id, "Local identity already set");
            return false;
        }
        info!(player = %id, "Local identity assigned");
        self.local = Some(id);
        true
    }

    pub fn local_identity(&self) -> Option<&PlayerId> {
        self.local.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.local.is_some()
    }

    /// Apply a join response: identity first, then every listed player and
    /// ourselves. Returns how many players were added.
    pub fn seed<V>(&mut self, response: &JoinResponse, view: &mut V) -> usize
    where
        V: ViewAdapter + ?Sized,
    {
        self.set_local_identity(response.player.player_id.clone());
        response
            .players
            .iter()
            .chain(std::iter::once(&response.player))
            .filter(|info| matches!(self.add_player(info, view), Ok(true)))
            .count()
    }

    /// Register a new player and create its visual.
    ///
    /// Returns `Ok(false)` when the id is already present or the roster is
    /// not ready yet. A visual that cannot be created leaves the player
    /// unregistered.
    pub fn add_player<V>(&mut self, info: &PlayerInfo, view: &mut V) -> Result<bool, ViewError>
    where
        V: ViewAdapter + ?Sized,
    {
        if !self.is_ready() {
            debug!(player = %info.player_id, "Join before handshake ignored");
            return Ok(false);
        }
        if self.players.contains_key(&info.player_id) {
            debug!(player = %info.player_id, "Player already present");
            return Ok(false);
        }

        let color = Color::from_hex(&info.color).unwrap_or_else(|| {
            warn!(player = %info.player_id, color = %info.color, "Invalid player color, using black");
            Color::BLACK
        });

        let spec = self
            .style
            .shape
            .parse::<ShapeKind>()
            .map(|kind| VisualSpec {
                kind,
                color,
                width: self.style.size,
                height: self.style.size,
                position: info.position(),
            });
        let visual = spec
            .and_then(|spec| view.create_visual(&spec))
            .map_err(|e| {
                error!(player = %info.player_id, error = %e, "Cannot create player visual");
                e
            })?;

        debug!(player = %info.player_id, %visual, position = %info.position(), "Player added");
        self.players.insert(
            info.player_id.clone(),
            Player {
                id: info.player_id.clone(),
                color,
                speed: self.style.speed,
                visual,
                motion: Motion::at(info.position()),
            },
        );
        Ok(true)
    }

    /// Release a player's visual and forget it. Unknown ids are ignored.
    pub fn remove_player<V>(&mut self, id: &PlayerId, view: &mut V) -> Option<Removal>
    where
        V: ViewAdapter + ?Sized,
    {
        let local = self.local.as_ref()?;
        let player = self.players.remove(id)?;
        view.destroy_visual(player.visual);

        if local == id {
            warn!(player = %id, "Local player removed by server");
            Some(Removal::Ejected)
        } else {
            debug!(player = %id, "Player removed");
            Some(Removal::Removed)
        }
    }

    /// Move a known player toward `target` at `speed`, or its own speed.
    /// Returns the animation length, or `None` for an unknown player.
    pub fn move_player<V>(
        &mut self,
        id: &PlayerId,
        target: Point,
        speed: Option<f64>,
        now: Instant,
        view: &mut V,
    ) -> Option<Duration>
    where
        V: ViewAdapter + ?Sized,
    {
        if !self.is_ready() {
            return None;
        }
        let player = self.players.get_mut(id)?;
        let speed = speed.unwrap_or(player.speed);
        Some(player.motion.move_to(player.visual, target, speed, now, view))
    }

    /// Start transitions for every key naming a known player. Returns how
    /// many moved.
    pub fn apply_positions<V>(
        &mut self,
        positions: &[(String, Point)],
        now: Instant,
        view: &mut V,
    ) -> usize
    where
        V: ViewAdapter + ?Sized,
    {
        positions
            .iter()
            .filter(|(key, target)| match self.resolve_key(key) {
                Some(id) => self.move_player(&id, *target, None, now, view).is_some(),
                None => {
                    debug!(key = %key, "Position for unknown player ignored");
                    false
                }
            })
            .count()
    }

    /// Map an object key back to the id of a registered player.
    pub fn resolve_key(&self, key: &str) -> Option<PlayerId> {
        PlayerId::key_candidates(key).find(|id| self.players.contains_key(id))
    }

    /// Feed one decoded publication into the roster.
    pub fn apply<V>(&mut self, event: InboundEvent, now: Instant, view: &mut V) -> Vec<RosterUpdate>
    where
        V: ViewAdapter + ?Sized,
    {
        if !self.is_ready() {
            debug!("Roster event before handshake ignored");
            return Vec::new();
        }

        match event {
            InboundEvent::Joined(players) => players
                .iter()
                .filter(|info| matches!(self.add_player(info, view), Ok(true)))
                .map(|info| RosterUpdate::Joined(info.player_id.clone()))
                .collect(),
            InboundEvent::Left(ids) => ids
                .into_iter()
                .filter_map(|id| match self.remove_player(&id, view)? {
                    Removal::Removed => Some(RosterUpdate::Left(id)),
                    Removal::Ejected => Some(RosterUpdate::Ejected(id)),
                })
                .collect(),
            InboundEvent::PositionUpdate(positions) => {
                self.apply_positions(&positions, now, view);
                Vec::new()
            }
        }
    }

    /// Release every visual. The local identity is kept.
    pub fn clear<V>(&mut self, view: &mut V)
    where
        V: ViewAdapter + ?Sized,
    {
        for (_, player) in self.players.drain() {
            view.destroy_visual(player.visual);
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.keys()
    }
}

#[cfg(test)]
mod tests;
