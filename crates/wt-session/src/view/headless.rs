//! Headless view adapter.
//!
//! Keeps visuals as plain records and logs every draw call. Used by the
//! command-line binary, which has no rendering surface.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, trace};
use wt_common::{Point, ViewError};

use super::{VisualHandle, VisualSpec, ViewAdapter};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessVisual {
    pub spec: VisualSpec,
    /// Last animation target, i.e. where the visual ends up.
    pub target: Point,
}

#[derive(Debug, Default)]
pub struct HeadlessView {
    next_handle: u64,
    visuals: HashMap<VisualHandle, HeadlessVisual>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&HeadlessVisual> {
        self.visuals.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

impl ViewAdapter for HeadlessView {
    fn create_visual(&mut self, spec: &VisualSpec) -> Result<VisualHandle, ViewError> {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        debug!(
            %handle,
            kind = %spec.kind,
            color = %spec.color.to_hex(),
            position = %spec.position,
            "Visual created"
        );
        self.visuals.insert(
            handle,
            HeadlessVisual {
                spec: spec.clone(),
                target: spec.position,
            },
        );
        Ok(handle)
    }

    fn animate(&mut self, handle: VisualHandle, target: Point, duration: Duration) {
        match self.visuals.get_mut(&handle) {
            Some(visual) => {
                visual.target = target;
                trace!(%handle, %target, ms = duration.as_millis() as u64, "Animate");
            }
            None => debug!(%handle, "Animate on unknown visual"),
        }
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            debug!(%handle, "Visual destroyed");
        }
    }
}
