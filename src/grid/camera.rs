use cgmath::{EuclideanSpace, Point2, Vector2};
use std::str::FromStr;
use thiserror::Error;

use super::Zoom;

/// Factor applied to the zoom for each scroll step in anchored mode.
pub const ZOOM_STEP: f64 = 1.1;

/// Smallest zoom level reachable in discrete mode.
const DISCRETE_MIN_ZOOM: f64 = 1.0;
/// Largest zoom level reachable in discrete mode.
const DISCRETE_MAX_ZOOM: f64 = 4.0;

/// How scroll steps change the zoom.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZoomMode {
    /// Continuous zoom by `ZOOM_STEP`, keeping the world point under the
    /// cursor fixed on screen.
    Anchored,
    /// Zoom doubles or halves between 1x and 4x. The world origin is the
    /// fixed point, not the cursor.
    Discrete,
}
impl Default for ZoomMode {
    fn default() -> Self {
        ZoomMode::Anchored
    }
}
impl FromStr for ZoomMode {
    type Err = UnknownZoomMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anchored" => Ok(ZoomMode::Anchored),
            "discrete" => Ok(ZoomMode::Discrete),
            _ => Err(UnknownZoomMode(s.to_owned())),
        }
    }
}

/// Name that does not match any `ZoomMode`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown zoom mode {0:?}, expected \"anchored\" or \"discrete\"")]
pub struct UnknownZoomMode(pub String);

/// 2D camera.
///
/// A world point `w` (in unscaled world pixels) is drawn at screen pixel
/// `(w + offset) * zoom`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// World-to-screen translation, in world pixels.
    offset: Vector2<f64>,
    /// Zoom factor.
    zoom: Zoom,
}
impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vector2::new(0.0, 0.0),
            zoom: Zoom::ONE,
        }
    }
}

impl Camera {
    /// Returns a camera at the world origin with no zoom.
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a camera at zoom 1 with the center of a world of the given size
    /// in the center of the screen.
    pub fn centered_on(world_size: Vector2<f64>, (screen_w, screen_h): (u32, u32)) -> Self {
        let screen = Vector2::new(screen_w as f64, screen_h as f64);
        Self {
            offset: -(world_size - screen) / 2.0,
            zoom: Zoom::ONE,
        }
    }

    /// Returns the world-to-screen translation.
    pub fn offset(self) -> Vector2<f64> {
        self.offset
    }
    /// Sets the world-to-screen translation.
    #[cfg(test)]
    pub fn set_offset(&mut self, offset: Vector2<f64>) {
        self.offset = offset;
    }

    /// Returns the zoom factor.
    pub fn zoom(self) -> Zoom {
        self.zoom
    }
    /// Sets the zoom factor without moving the offset.
    #[cfg(test)]
    pub fn set_zoom(&mut self, zoom: Zoom) {
        self.zoom = zoom;
    }

    /// Returns the world coordinates under a screen pixel.
    pub fn screen_to_world(self, pixel: Point2<f64>) -> Point2<f64> {
        pixel / self.zoom.factor() - self.offset
    }
    /// Returns the screen pixel at which a world point is drawn.
    pub fn world_to_screen(self, world: Point2<f64>) -> Point2<f64> {
        Point2::from_vec((world + self.offset).to_vec() * self.zoom.factor())
    }

    /// Pans by a distance in screen pixels, so that whatever was under the
    /// cursor follows it exactly.
    ///
    /// There are no bounds on the resulting offset.
    pub fn pan_by_pixels(&mut self, delta: Vector2<f64>) {
        self.offset += delta / self.zoom.factor();
    }

    /// Sets the zoom, keeping one screen pixel over the same world point.
    ///
    /// The offset is recomputed from the zoom actually reached, so the point
    /// stays put even when `zoom` was clamped.
    pub fn zoom_to(&mut self, zoom: Zoom, invariant_pixel: Point2<f64>) {
        let world = self.screen_to_world(invariant_pixel);
        self.zoom = zoom;
        self.offset = invariant_pixel / self.zoom.factor() - world;
    }
    /// Zooms by the given factor, keeping one screen pixel over the same world
    /// point.
    pub fn zoom_by_factor(&mut self, factor: f64, invariant_pixel: Point2<f64>) {
        assert!(
            factor > 0.0,
            "Zoom factor must be a positive number, not {}",
            factor,
        );
        self.zoom_to(self.zoom * factor, invariant_pixel);
    }

    /// Applies one scroll step.
    ///
    /// In anchored mode `invariant_pixel` stays over the same world point.
    pub fn scroll(&mut self, mode: ZoomMode, zoom_in: bool, invariant_pixel: Point2<f64>) {
        match mode {
            ZoomMode::Anchored => {
                let factor = if zoom_in { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                self.zoom_by_factor(factor, invariant_pixel);
            }
            ZoomMode::Discrete => self.step_discrete(zoom_in),
        }
    }

    /// Doubles or halves the zoom within the discrete zoom range.
    fn step_discrete(&mut self, zoom_in: bool) {
        let clamp = |f: f64| f.max(DISCRETE_MIN_ZOOM).min(DISCRETE_MAX_ZOOM);
        let current = clamp(self.zoom.round().factor());
        let next = if zoom_in { current * 2.0 } else { current / 2.0 };
        self.zoom = Zoom::from_factor(clamp(next));
    }
}
