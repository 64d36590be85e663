//! Rendering surface consumed by the roster and motion interpolator.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wt_common::{Color, Point, ViewError};

pub mod headless;

pub use headless::HeadlessView;

/// Opaque handle to a visual owned by a [`ViewAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

impl fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rect,
}

impl FromStr for ShapeKind {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "rect" => Ok(Self::Rect),
            _ => Err(ViewError::UnsupportedShape(s.to_string())),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle => f.write_str("circle"),
            Self::Rect => f.write_str("rect"),
        }
    }
}

/// Everything needed to create a player's visual.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSpec {
    pub kind: ShapeKind,
    pub color: Color,
    pub width: f64,
    pub height: f64,
    pub position: Point,
}

/// Rendering backend driven by the session.
///
/// Calls arrive from the session actor only, so implementations need no
/// internal locking.
///
/// The adapter is output only. Pointer-down input from the same surface
/// enters through [`GameClient::pointer_down`](crate::GameClient::pointer_down),
/// which the embedding application calls from its own event loop.
pub trait ViewAdapter: Send + 'static {
    fn create_visual(&mut self, spec: &VisualSpec) -> Result<VisualHandle, ViewError>;

    /// Move `handle` linearly to `target` over `duration`. A zero duration
    /// places it immediately and stops any running animation.
    fn animate(&mut self, handle: VisualHandle, target: Point, duration: Duration);

    fn destroy_visual(&mut self, handle: VisualHandle);
}
