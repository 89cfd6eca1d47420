use std::sync::mpsc::{Receiver, Sender};

use image::RgbaImage;

use crate::{DisplayMode, Item, ItemId};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot render item {id} at {width}x{height}")]
    InvalidSize { id: ItemId, width: u32, height: u32 },
    #[error("failed to decode artwork for item {id}: {source}")]
    Decode {
        id: ItemId,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to render item {id}: {message}")]
    Backend { id: ItemId, message: String },
}

/// Rasterizes the cover for an item. Runs on the render thread, never on the UI thread.
pub trait RenderBackend<I>: Send + 'static {
    fn render_image(
        &mut self,
        item: &I,
        mode: DisplayMode,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError>;
}

#[derive(Debug, Clone)]
pub struct RenderRequest<I> {
    pub item: I,
    pub mode: DisplayMode,
    pub width: u32,
    pub height: u32,
}

/// A finished (or failed) render, along with the parameters it was made for so stale
/// results can be recognised.
#[derive(Debug)]
pub struct RenderedImage {
    pub id: ItemId,
    pub mode: DisplayMode,
    pub width: u32,
    pub height: u32,
    pub image: Result<RgbaImage, RenderError>,
}

enum UiToRenderMessage<I> {
    Render(RenderRequest<I>),
    Shutdown,
}

/// A single background worker that renders covers in request order.
pub struct RenderThread<I: Item> {
    ui_to_render_tx: Sender<UiToRenderMessage<I>>,
    render_to_ui_rx: Receiver<RenderedImage>,
    render_thread_handle: Option<std::thread::JoinHandle<()>>,
}
impl<I: Item> RenderThread<I> {
    pub fn new(backend: impl RenderBackend<I>) -> Self {
        let (ui_to_render_tx, ui_to_render_rx) = std::sync::mpsc::channel();
        let (render_to_ui_tx, render_to_ui_rx) = std::sync::mpsc::channel();

        let render_thread_handle = std::thread::spawn(move || {
            Self::run(backend, ui_to_render_rx, render_to_ui_tx);
        });

        Self {
            ui_to_render_tx,
            render_to_ui_rx,
            render_thread_handle: Some(render_thread_handle),
        }
    }

    pub fn request(&self, request: RenderRequest<I>) {
        let id = request.item.id();
        if self
            .ui_to_render_tx
            .send(UiToRenderMessage::Render(request))
            .is_err()
        {
            tracing::warn!("Render thread is gone, dropping request for {id}");
        }
    }

    /// The next finished render, if any, without blocking.
    pub fn try_recv(&self) -> Option<RenderedImage> {
        self.render_to_ui_rx.try_recv().ok()
    }

    fn run(
        mut backend: impl RenderBackend<I>,
        ui_to_render_rx: Receiver<UiToRenderMessage<I>>,
        render_to_ui_tx: Sender<RenderedImage>,
    ) {
        while let Ok(message) = ui_to_render_rx.recv() {
            let request = match message {
                UiToRenderMessage::Render(request) => request,
                UiToRenderMessage::Shutdown => break,
            };

            let id = request.item.id();
            let image = if request.width == 0 || request.height == 0 {
                Err(RenderError::InvalidSize {
                    id,
                    width: request.width,
                    height: request.height,
                })
            } else {
                backend.render_image(&request.item, request.mode, request.width, request.height)
            };

            match &image {
                Ok(_) => tracing::debug!(
                    "Rendered cover for {id} ({}x{}, {})",
                    request.width,
                    request.height,
                    request.mode
                ),
                Err(e) => tracing::warn!("{e}"),
            }

            let rendered = RenderedImage {
                id,
                mode: request.mode,
                width: request.width,
                height: request.height,
                image,
            };
            if render_to_ui_tx.send(rendered).is_err() {
                break;
            }
        }
        tracing::debug!("Render thread shutting down");
    }
}
impl<I: Item> Drop for RenderThread<I> {
    fn drop(&mut self) {
        let _ = self.ui_to_render_tx.send(UiToRenderMessage::Shutdown);
        if let Some(handle) = self.render_thread_handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("Render thread panicked");
        }
    }
}
