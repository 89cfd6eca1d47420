//! The cover browser widget: owns the window, the cache, the gesture state and the render
//! thread, and is driven entirely from the UI thread.
use std::{collections::HashSet, sync::mpsc::Sender, time::Instant};

use image::RgbaImage;

use crate::{
    BitmapCache, CoverImage, CoverViewConfig, Delta, DisplayMode, GestureController,
    GestureOutcome, Item, ItemId, ItemSource, RenderBackend, RenderRequest, RenderThread,
    RenderedImage, Renderer, SlotChanges, SongWindow, SourceEvent, Surface, TouchEvent,
};

/// Messages from the view to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverViewEvent {
    /// A settle landed on a neighbouring cover. The view has already moved its own window;
    /// the host is expected to move the real playback position to match.
    SetSong { delta: Delta },
    /// The view was tapped without dragging.
    Clicked,
}

pub struct CoverView<I: Item, T: CoverImage> {
    window: SongWindow<I>,
    cache: BitmapCache<T>,
    gesture: GestureController,
    renderer: Renderer,
    render_thread: RenderThread<I>,
    in_flight: HashSet<ItemId>,
    display_mode: DisplayMode,
    viewport: [u32; 2],
    needs_redraw: bool,
    event_tx: Sender<CoverViewEvent>,
}
impl<I: Item, T: CoverImage> CoverView<I, T> {
    pub fn new(
        config: &CoverViewConfig,
        backend: impl RenderBackend<I>,
        event_tx: Sender<CoverViewEvent>,
    ) -> Self {
        Self {
            window: SongWindow::new(),
            cache: BitmapCache::new(config.cache_capacity),
            gesture: GestureController::new(config),
            renderer: Renderer::default(),
            render_thread: RenderThread::new(backend),
            in_flight: HashSet::new(),
            display_mode: config.display_mode,
            viewport: [0, 0],
            needs_redraw: true,
            event_tx,
        }
    }

    pub fn window(&self) -> &SongWindow<I> {
        &self.window
    }

    pub fn cache(&self) -> &BitmapCache<T> {
        &self.cache
    }

    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn viewport(&self) -> [u32; 2] {
        self.viewport
    }

    pub fn scroll_offset(&self) -> f32 {
        self.gesture.scroll_offset()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn is_animating(&self) -> bool {
        self.gesture.is_settling()
    }

    /// Number of renders requested but not yet drained.
    pub fn pending_renders(&self) -> usize {
        self.in_flight.len()
    }

    pub fn set_background(&mut self, rgba: [u8; 4]) {
        self.renderer.background = rgba;
        self.needs_redraw = true;
    }

    /// Reads the cursor and every slot from the source.
    pub fn initialize(&mut self, source: &impl ItemSource<I>) {
        let changes = self.window.initialize(source);
        tracing::debug!("Initialized cover view at position {}", self.window.position());
        self.request_images(changes);
        self.needs_redraw = true;
    }

    /// Handles a notification from the item source.
    pub fn receive(&mut self, event: SourceEvent<I>, source: &impl ItemSource<I>) {
        let changes = self.window.apply_external_update(event, source);
        self.request_images(changes);
        self.needs_redraw = true;
    }

    /// Moves the window one step and recenters. Only local display state changes.
    pub fn go(&mut self, delta: Delta) {
        self.window.shift(delta);
        self.reset_scroll();
        self.needs_redraw = true;
    }

    /// Covers are rendered for a specific size, so a resize throws them all away.
    /// Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || self.viewport == [width, height] {
            return;
        }
        tracing::debug!("Cover view resized to {width}x{height}");
        self.viewport = [width, height];
        self.reset_scroll();
        self.regenerate();
    }

    pub fn toggle_display_mode(&mut self) {
        self.set_display_mode(self.display_mode.toggled());
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if mode == self.display_mode {
            return;
        }
        tracing::debug!("Switching display mode to {mode}");
        self.display_mode = mode;
        self.regenerate();
    }

    pub fn on_touch(&mut self, event: TouchEvent) {
        self.interrupt_settle();
        match self.gesture.on_touch(event, self.window.at_start()) {
            GestureOutcome::None => {}
            GestureOutcome::Redraw | GestureOutcome::Settle { .. } => self.needs_redraw = true,
            GestureOutcome::Click => self.send(CoverViewEvent::Clicked),
        }
    }

    /// Animates to the previous or next cover, committing when the settle completes.
    pub fn scroll_to_neighbour(&mut self, delta: Delta, now: Instant) {
        if self.gesture.is_dragging() {
            return;
        }
        self.interrupt_settle();
        let outcome = self
            .gesture
            .scroll_to_neighbour(delta, self.window.at_start(), now);
        if outcome != GestureOutcome::None {
            self.needs_redraw = true;
        }
    }

    /// Drains finished renders and advances the settle animation. `upload` turns a
    /// rendered image into whatever the cache stores. Returns whether a redraw is needed.
    pub fn update(&mut self, now: Instant, mut upload: impl FnMut(ItemId, RgbaImage) -> T) -> bool {
        while let Some(rendered) = self.render_thread.try_recv() {
            self.apply_rendered(rendered, &mut upload);
        }

        if let Some(frame) = self.gesture.tick(now) {
            self.needs_redraw = true;
            if frame.finished
                && let Some(delta) = frame.commit
            {
                self.commit(delta);
                self.reset_scroll();
            }
        }

        self.needs_redraw
    }

    /// Paints the current state. Returns the number of covers drawn.
    pub fn draw(&mut self, surface: &mut impl Surface<T>) -> usize {
        self.needs_redraw = false;
        self.renderer.draw(
            surface,
            &self.window,
            &self.cache,
            self.gesture.scroll_offset(),
            self.viewport,
        )
    }

    fn apply_rendered(
        &mut self,
        rendered: RenderedImage,
        upload: &mut impl FnMut(ItemId, RgbaImage) -> T,
    ) {
        let RenderedImage {
            id,
            mode,
            width,
            height,
            image,
        } = rendered;

        if mode != self.display_mode || [width, height] != self.viewport {
            tracing::debug!("Discarding stale cover for {id} ({width}x{height}, {mode})");
            return;
        }
        self.in_flight.remove(&id);

        let Ok(image) = image else {
            // Already logged by the render thread; the slot stays blank.
            return;
        };
        if self.cache.contains(id) {
            return;
        }
        if self.cache.insert(id, upload(id, image)) {
            self.needs_redraw = true;
        }
    }

    /// Drops every cover and asks for all three slots again.
    fn regenerate(&mut self) {
        self.cache.evict_all();
        self.in_flight.clear();
        self.request_images(SlotChanges::all());
        self.needs_redraw = true;
    }

    /// Reports a move to the host and shifts the window to match. The gesture controller
    /// has already recentred the offset.
    fn commit(&mut self, delta: Delta) {
        tracing::debug!("Committing move {delta}");
        self.send(CoverViewEvent::SetSong { delta });
        self.window.shift(delta);
        self.needs_redraw = true;
    }

    /// A settle cut short still lands on its page.
    fn interrupt_settle(&mut self) {
        if let Some(delta) = self.gesture.interrupt() {
            self.commit(delta);
        }
    }

    fn reset_scroll(&mut self) {
        if let Some(delta) = self.gesture.reset(self.viewport[0] as f32) {
            self.commit(delta);
        }
    }

    fn request_images(&mut self, changes: SlotChanges) {
        for slot in changes.iter() {
            if let Some(item) = self.window.get(slot).cloned() {
                self.ensure(item);
            }
        }
    }

    fn ensure(&mut self, item: I) {
        let id = item.id();
        let [width, height] = self.viewport;
        if width == 0 || height == 0 || self.cache.contains(id) || self.in_flight.contains(&id) {
            return;
        }
        self.in_flight.insert(id);
        self.render_thread.request(RenderRequest {
            item,
            mode: self.display_mode,
            width,
            height,
        });
    }

    fn send(&self, event: CoverViewEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Cover view host has gone away, dropping {event:?}");
        }
    }
}
