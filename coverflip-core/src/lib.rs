//! The core of the cover browser: a three-slot navigation window, a bounded cover cache,
//! the drag/fling gesture state machine and the settle animation that commits navigation.
//!
//! Everything here runs on a single UI thread except [`RenderThread`], which rasterizes
//! covers in the background and hands them back through a channel drained by
//! [`CoverView::update`].

pub mod bitmap_cache;
pub mod config;
pub mod cover_view;
pub mod gesture;
pub mod item;
pub mod render_thread;
pub mod renderer;
pub mod scroll_animator;
pub mod song_window;
pub mod velocity;

#[cfg(test)]
mod testing;

pub use bitmap_cache::{BitmapCache, CoverImage, DEFAULT_CACHE_CAPACITY, ReleaseError};
pub use config::{CoverViewConfig, DisplayMode};
pub use cover_view::{CoverView, CoverViewEvent};
pub use gesture::{GestureController, GestureOutcome, Phase, SettleFrame, TouchEvent, TouchKind};
pub use item::{Delta, Item, ItemId, ItemSource, SourceEvent};
pub use render_thread::{RenderBackend, RenderError, RenderRequest, RenderThread, RenderedImage};
pub use renderer::{Rect, Renderer, Surface};
pub use scroll_animator::{AnimationSample, ScrollAnimator};
pub use song_window::{CENTER_SLOT, STORE_SIZE, SlotChanges, SongWindow};
pub use velocity::VelocityTracker;

pub use image;
