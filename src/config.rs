use std::path::PathBuf;
use std::time::Duration;

use crate::grid::{ZoomMode, GRID_HEIGHT, GRID_WIDTH};

/// Atlas image loaded when nothing else is configured.
const DEFAULT_ATLAS_PATH: &str = "tileset.png";
/// Width and height of one atlas sprite, in pixels.
const DEFAULT_TILE_SIZE: (u32, u32) = (32, 32);
/// Initial window size, in physical pixels.
const DEFAULT_WINDOW_SIZE: (u32, u32) = (800, 600);
/// Frame rate cap.
const DEFAULT_FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Environment variable that selects the zoom mode (`anchored` or
/// `discrete`).
pub const ZOOM_MODE_VAR: &str = "TILEMAP_ZOOM_MODE";

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub atlas_path: PathBuf,
    pub tile_size: (u32, u32),
    pub window_size: (u32, u32),
    pub grid_size: (usize, usize),
    pub zoom_mode: ZoomMode,
    /// Minimum time between the starts of two frames.
    pub frame_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            atlas_path: PathBuf::from(DEFAULT_ATLAS_PATH),
            tile_size: DEFAULT_TILE_SIZE,
            window_size: DEFAULT_WINDOW_SIZE,
            grid_size: (GRID_WIDTH, GRID_HEIGHT),
            zoom_mode: ZoomMode::default(),
            frame_duration: DEFAULT_FRAME_DURATION,
        }
    }
}

impl Config {
    /// Returns the default configuration with overrides from the environment
    /// applied.
    pub fn from_env() -> Self {
        Self::default().with_zoom_mode_from(std::env::var(ZOOM_MODE_VAR).ok().as_deref())
    }

    /// Sets the zoom mode from its name, if one is given. An unrecognized
    /// name is logged and leaves the zoom mode unchanged.
    pub fn with_zoom_mode_from(mut self, name: Option<&str>) -> Self {
        if let Some(name) = name {
            match name.parse() {
                Ok(mode) => self.zoom_mode = mode,
                Err(e) => log::warn!("Ignoring {}: {}", ZOOM_MODE_VAR, e),
            }
        }
        self
    }
}
