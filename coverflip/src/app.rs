use std::{
    sync::mpsc::Receiver,
    time::{Duration, Instant},
};

use egui::{
    Align2, CentralPanel, Color32, Context, Event, FontId, Frame, Key, Painter, PointerButton,
    Pos2, RichText, TextureHandle, TextureOptions, Visuals, pos2, vec2,
};

use coverflip_core::{
    CoverImage, CoverView, CoverViewEvent, Delta, DisplayMode, ItemId, Rect, SourceEvent, Surface,
    TouchEvent, image::RgbaImage,
};
use coverflip_state::{Playlist, Song};

use crate::{
    config::Config,
    cover_renderer::{CoverRenderer, INFO_BAND_FRACTION},
    style::Style,
};

const KEY_PREVIOUS: Key = Key::ArrowLeft;
const KEY_NEXT: Key = Key::ArrowRight;
const KEY_TOGGLE_MODE: Key = Key::M;
const KEY_INFO: Key = Key::I;

/// A rendered cover uploaded to the GPU, plus the text drawn into its info band.
pub struct CoverTexture {
    texture: TextureHandle,
    title: String,
    subtitle: Option<String>,
}
impl CoverImage for CoverTexture {
    fn size(&self) -> [u32; 2] {
        self.texture.size().map(|v| v as u32)
    }
}

pub struct App {
    config: Config,
    playlist: Playlist,
    playlist_rx: Receiver<SourceEvent<Song>>,
    view: CoverView<Song, CoverTexture>,
    view_rx: Receiver<CoverViewEvent>,
    pointer_down: bool,
    show_info: bool,
}
impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, mut playlist: Playlist) -> Self {
        cc.egui_ctx.set_visuals(Visuals::dark());
        cc.egui_ctx.style_mut(|style| {
            style.visuals.panel_fill = config.style.background();
            style.visuals.override_text_color = Some(config.style.text());
        });

        let playlist_rx = playlist.subscribe();
        let (view_tx, view_rx) = std::sync::mpsc::channel();
        let mut view = CoverView::new(&config.cover_view, CoverRenderer, view_tx);
        view.set_background(config.style.background_rgba());
        view.initialize(&playlist);

        Self {
            config,
            playlist,
            playlist_rx,
            view,
            view_rx,
            pointer_down: false,
            show_info: false,
        }
    }

    fn handle_input(&mut self, ctx: &Context, rect: egui::Rect) {
        let now = Instant::now();
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    let local = pos - rect.min;
                    if pressed && rect.contains(pos) {
                        self.pointer_down = true;
                        self.view.on_touch(TouchEvent::down(local.x, local.y, now));
                    } else if !pressed && self.pointer_down {
                        self.pointer_down = false;
                        self.view.on_touch(TouchEvent::up(local.x, local.y, now));
                    }
                }
                Event::PointerMoved(pos) if self.pointer_down => {
                    let local = pos - rect.min;
                    self.view.on_touch(TouchEvent::moved(local.x, local.y, now));
                }
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if modifiers.is_none() => match key {
                    KEY_PREVIOUS => self.view.scroll_to_neighbour(Delta::Backward, now),
                    KEY_NEXT => self.view.scroll_to_neighbour(Delta::Forward, now),
                    KEY_TOGGLE_MODE => self.view.toggle_display_mode(),
                    KEY_INFO => self.show_info = !self.show_info,
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn handle_view_events(&mut self) {
        while let Ok(event) = self.view_rx.try_recv() {
            match event {
                CoverViewEvent::SetSong { delta } => {
                    if let Some(song) = self.playlist.set_song(delta) {
                        tracing::info!("Now playing {}", song.title);
                    }
                }
                CoverViewEvent::Clicked => self.show_info = !self.show_info,
            }
        }
    }

    fn info_window(&mut self, ctx: &Context) {
        let mut open = self.show_info;
        egui::Window::new("Song info")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_TOP, vec2(0.0, 16.0))
            .show(ctx, |ui| {
                let Some(song) = self.playlist.current() else {
                    ui.label("Nothing to play");
                    return;
                };
                ui.label(RichText::new(&song.title).heading());
                if let Some(artist) = &song.artist {
                    ui.label(artist);
                }
                if let Some(album) = &song.album {
                    ui.label(RichText::new(album).italics());
                }
                if let Some(path) = &song.path {
                    ui.label(RichText::new(path.display().to_string()).small());
                }
                ui.separator();
                ui.label(format!(
                    "{} of {} · {} layout",
                    self.playlist.cursor() + 1,
                    self.playlist.len(),
                    self.view.display_mode()
                ));
            });
        self.show_info = open;
    }
}
impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.playlist_rx.try_recv() {
            self.view.receive(event, &self.playlist);
        }

        CentralPanel::default()
            .frame(Frame::NONE.fill(self.config.style.background()))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.view
                    .set_viewport(rect.width().round() as u32, rect.height().round() as u32);
                self.handle_input(ctx, rect);

                let playlist = &self.playlist;
                let mode = self.view.display_mode();
                let needs_redraw = self.view.update(Instant::now(), |id, image| {
                    upload_cover(ctx, playlist, mode, id, image)
                });

                let mut surface = PainterSurface {
                    painter: ui.painter_at(rect),
                    origin: rect.min,
                    style: &self.config.style,
                };
                self.view.draw(&mut surface);

                if needs_redraw || self.view.is_animating() || self.view.pending_renders() > 0 {
                    ctx.request_repaint();
                }
            });

        if self.show_info {
            self.info_window(ctx);
        }
        self.handle_view_events();

        ctx.request_repaint_after(Duration::from_secs_f32(self.config.general.repaint_secs));
    }
}

fn upload_cover(
    ctx: &Context,
    playlist: &Playlist,
    mode: DisplayMode,
    id: ItemId,
    image: RgbaImage,
) -> CoverTexture {
    let size = [image.width() as usize, image.height() as usize];
    let texture = ctx.load_texture(
        format!("cover-{id}-{mode}"),
        egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()),
        TextureOptions::LINEAR,
    );
    let song = playlist.find(id);
    CoverTexture {
        texture,
        title: song.map(|song| song.title.clone()).unwrap_or_default(),
        subtitle: song.and_then(|song| song.subtitle()),
    }
}

/// Paints covers with egui. Cover coordinates are relative to `origin`.
struct PainterSurface<'a> {
    painter: Painter,
    origin: Pos2,
    style: &'a Style,
}
impl Surface<CoverTexture> for PainterSurface<'_> {
    fn clip_bounds(&self) -> Rect {
        let clip = self.painter.clip_rect();
        Rect::new(
            clip.min.x - self.origin.x,
            clip.min.y - self.origin.y,
            clip.width(),
            clip.height(),
        )
    }

    fn fill_background(&mut self, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.painter.rect_filled(
            self.painter.clip_rect(),
            0.0,
            Color32::from_rgba_unmultiplied(r, g, b, a),
        );
    }

    fn draw_image(&mut self, cover: &CoverTexture, x: f32, y: f32) {
        let size = cover.texture.size_vec2();
        let rect = egui::Rect::from_min_size(self.origin + vec2(x, y), size);
        self.painter.image(
            cover.texture.id(),
            rect,
            egui::Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        // Both layouts reserve the bottom band for text.
        let band_height = size.y * INFO_BAND_FRACTION;
        let band_middle = rect.bottom() - band_height / 2.0;
        let text_x = rect.left() + 12.0;
        self.painter.text(
            pos2(text_x, band_middle),
            Align2::LEFT_BOTTOM,
            &cover.title,
            FontId::proportional((band_height * 0.3).clamp(10.0, 22.0)),
            self.style.text(),
        );
        if let Some(subtitle) = &cover.subtitle {
            self.painter.text(
                pos2(text_x, band_middle + 2.0),
                Align2::LEFT_TOP,
                subtitle,
                FontId::proportional((band_height * 0.2).clamp(9.0, 16.0)),
                self.style.subtitle(),
            );
        }
    }
}
