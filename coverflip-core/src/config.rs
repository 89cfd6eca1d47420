use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    bitmap_cache::DEFAULT_CACHE_CAPACITY, scroll_animator::DEFAULT_MS_PER_PIXEL,
    velocity::DEFAULT_VELOCITY_WINDOW,
};

/// How song information is laid out relative to the cover art.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Information is drawn on top of the art.
    #[default]
    Overlay,
    /// Art and information get their own regions.
    Separate,
}
impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Overlay => DisplayMode::Separate,
            DisplayMode::Separate => DisplayMode::Overlay,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Overlay => "Overlay",
            DisplayMode::Separate => "Separate",
        }
    }
}
impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tunables for the cover view. Distances are in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoverViewConfig {
    /// Initial display mode.
    pub display_mode: DisplayMode,
    /// Number of rendered covers kept alive.
    pub cache_capacity: usize,
    /// Pointer travel (horizontal plus vertical) below which a release counts as a click.
    pub click_threshold: f32,
    /// Release velocity, in pixels per second, needed to fling past the nearest page.
    pub min_fling_velocity: f32,
    /// How far back pointer samples are considered when computing release velocity.
    pub velocity_window_ms: u64,
    /// Settle animation length per pixel of travel.
    pub settle_ms_per_pixel: f32,
}
impl Default for CoverViewConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            click_threshold: 10.0,
            min_fling_velocity: 200.0,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW.as_millis() as u64,
            settle_ms_per_pixel: DEFAULT_MS_PER_PIXEL,
        }
    }
}
impl CoverViewConfig {
    pub fn velocity_window(&self) -> Duration {
        Duration::from_millis(self.velocity_window_ms)
    }
}
