//! Target position + speed to time-bounded linear transitions.

use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;
use wt_common::Point;

use crate::view::{ViewAdapter, VisualHandle};

/// Time needed to cover `distance` at `speed` units per second, rounded to
/// whole milliseconds. `None` when the speed cannot produce a duration.
pub fn transition_duration(distance: f64, speed: f64) -> Option<Duration> {
    if !speed.is_finite() || speed <= 0.0 || !distance.is_finite() {
        return None;
    }
    let millis = (distance / speed * 1000.0).round();
    Some(Duration::from_millis(millis as u64))
}

/// One in-flight move.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionTransition {
    pub from: Point,
    pub to: Point,
    pub speed: f64,
    pub started_at: Instant,
    pub duration: Duration,
}

impl MotionTransition {
    /// Interpolated position at `now`.
    pub fn position_at(&self, now: Instant) -> Point {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(self.to, t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

/// Motion state of one player: where it rests, or the transition it is in.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    resting: Point,
    active: Option<MotionTransition>,
}

impl Motion {
    pub fn at(position: Point) -> Self {
        Self {
            resting: position,
            active: None,
        }
    }

    /// Rendered position at `now`.
    pub fn position_at(&self, now: Instant) -> Point {
        match &self.active {
            Some(transition) => transition.position_at(now),
            None => self.resting,
        }
    }

    /// Where the player ends up once the current transition completes.
    pub fn destination(&self) -> Point {
        self.resting
    }

    /// The transition still running at `now`, if any.
    pub fn transition(&self, now: Instant) -> Option<&MotionTransition> {
        self.active.as_ref().filter(|t| !t.is_finished(now))
    }

    /// Start a transition toward `target`, overriding any in-flight one.
    ///
    /// The new transition starts at the position rendered at `now`.
    /// Returns the animation length; zero means the visual was placed (or
    /// left) at `target` without animating.
    pub fn move_to<V>(
        &mut self,
        handle: VisualHandle,
        target: Point,
        speed: f64,
        now: Instant,
        view: &mut V,
    ) -> Duration
    where
        V: ViewAdapter + ?Sized,
    {
        let from = self.position_at(now);
        let was_moving = self.transition(now).is_some();
        let distance = from.distance_to(target);

        self.resting = target;

        if distance == 0.0 {
            self.active = None;
            if was_moving {
                // Already there; just stop the running animation.
                view.animate(handle, target, Duration::ZERO);
            }
            return Duration::ZERO;
        }

        let Some(duration) = transition_duration(distance, speed) else {
            warn!(%handle, speed, "Unusable speed, placing visual without animation");
            self.active = None;
            view.animate(handle, target, Duration::ZERO);
            return Duration::ZERO;
        };

        self.active = Some(MotionTransition {
            from,
            to: target,
            speed,
            started_at: now,
            duration,
        });
        view.animate(handle, target, duration);
        duration
    }
}
