//! Hand-drawn sections, accumulated one clicked vertex at a time.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use strum::Display;
use tracing::debug;

use crate::types::{LatLng, Pitch, RoofSection, SectionSource};

/// Minimum vertices before a drawing can be finalized
pub const MIN_VERTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EditorState {
    /// No points placed
    Idle,
    /// Between one and two points placed
    Accumulating,
    /// Three or more points placed; finalize will produce a section
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEditor {
    points: Vec<LatLng>,
}

impl ManualEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        match self.points.len() {
            0 => EditorState::Idle,
            n if n < MIN_VERTICES => EditorState::Accumulating,
            _ => EditorState::Ready,
        }
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// Append a vertex. There is no upper bound on vertex count.
    pub fn add_point(&mut self, point: LatLng) -> EditorState {
        self.points.push(point);
        let state = self.state();
        debug!(points = self.points.len(), %state, "added point");
        state
    }

    /// Promote the accumulated points to a section with the default manual
    /// pitch. Below three points nothing happens and the points are kept.
    pub fn finalize(&mut self) -> Option<RoofSection> {
        if self.state() != EditorState::Ready {
            return None;
        }

        let vertices = std::mem::take(&mut self.points);
        let section = RoofSection::new(vertices, Pitch::ManualDefault, SectionSource::Manual);
        debug!(area_sqft = section.area_sqft, "finalized manual section");
        Some(section)
    }

    /// Discard the drawing in progress
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
