use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::shape::{DEFAULT_SHAPE_SIZE, MAGNETIC_RANGE};

/// Tunables of the canvas interaction, persisted with the app state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Endpoints snap to magnetic points closer than this.
    pub magnetic_range: f32,
    /// Manhattan distance that turns a click into a drag.
    pub drag_threshold: f32,
    /// Offset applied to pasted and duplicated shapes.
    pub paste_offset: Vec2,
    /// Where a keyboard paste lands when nothing is selected.
    pub default_paste_position: Pos2,
    /// Side of new polygon shapes and length of new connectors.
    pub default_shape_size: f32,
    pub undo_limit: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            magnetic_range: MAGNETIC_RANGE,
            drag_threshold: 10.0,
            paste_offset: Vec2::splat(20.0),
            default_paste_position: Pos2::new(500.0, 500.0),
            default_shape_size: DEFAULT_SHAPE_SIZE,
            undo_limit: 200,
        }
    }
}
