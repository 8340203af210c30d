//! Viewport culling

use serde::{Deserialize, Serialize};

use crate::consts::{CULL_MARGIN, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Visible area plus a margin on every side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, CULL_MARGIN)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Whether the box at (x, y) of size (w, h) touches the expanded viewport
    pub fn is_visible(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        x + w >= -self.margin
            && x <= self.width + self.margin
            && y + h >= -self.margin
            && y <= self.height + self.margin
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
