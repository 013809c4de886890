#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN};
use crate::geometry::Point;

/// Camera state for pan/zoom on the diagram surface.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom), kept within `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Translate the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Change zoom while keeping the diagram point under `center` (screen
    /// space) fixed on screen. The target is clamped to the zoom limits.
    pub fn zoom_to(&mut self, target: f64, center: Point) {
        let zoom = clamp_zoom(target);
        let anchor = self.screen_to_world(center);
        self.zoom = zoom;
        self.pan_x = center.x - anchor.x * zoom;
        self.pan_y = center.y - anchor.y * zoom;
    }

    /// Return to identity pan and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy of `self` with zoom forced into range. Used when accepting camera
    /// state from outside the engine.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self { zoom: clamp_zoom(self.zoom), ..self }
    }

    /// Convert a screen-space point to diagram coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a diagram-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to diagram-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}
