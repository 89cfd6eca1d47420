//! Rasterizes song covers on the render thread.
use image::{Rgba, RgbaImage, imageops};

use coverflip_core::{DisplayMode, Item, ItemId, RenderBackend, RenderError};
use coverflip_state::Song;

use crate::style;

/// Fraction of the cover height given to the title/artist band.
pub const INFO_BAND_FRACTION: f32 = 0.2;
/// How much of each pixel's brightness survives under the overlay band.
const OVERLAY_BAND_BRIGHTNESS: f32 = 0.4;
/// How much of the art's average brightness is used to fill letterboxing.
const LETTERBOX_BRIGHTNESS: f32 = 0.5;

pub fn band_height(height: u32) -> u32 {
    ((height as f32 * INFO_BAND_FRACTION).round() as u32).min(height)
}

pub struct CoverRenderer;
impl RenderBackend<Song> for CoverRenderer {
    fn render_image(
        &mut self,
        song: &Song,
        mode: DisplayMode,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError> {
        let id = song.id();
        let art = song
            .cover
            .as_deref()
            .map(|bytes| decode(id, bytes))
            .transpose()?;

        Ok(match mode {
            DisplayMode::Overlay => {
                let mut canvas = compose(art.as_ref(), id, width, height);
                darken_bottom(&mut canvas, band_height(height));
                canvas
            }
            DisplayMode::Separate => {
                let art_height = (height - band_height(height)).max(1);
                let cover = compose(art.as_ref(), id, width, art_height);
                let mut canvas = RgbaImage::from_pixel(width, height, average_colour(&cover));
                imageops::overlay(&mut canvas, &cover, 0, 0);
                canvas
            }
        })
    }
}

fn decode(id: ItemId, bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    let image =
        image::load_from_memory(bytes).map_err(|source| RenderError::Decode { id, source })?;
    Ok(image.to_rgba8())
}

/// The art scaled to fit inside `width`x`height` and centred, or a flat colour derived
/// from the id when there is no art.
fn compose(art: Option<&RgbaImage>, id: ItemId, width: u32, height: u32) -> RgbaImage {
    let Some(art) = art.filter(|art| art.width() > 0 && art.height() > 0) else {
        let colour = style::hsv_to_rgba(style::hash_to_hsv(id.0));
        return RgbaImage::from_pixel(width, height, Rgba(colour));
    };

    let scale = (width as f32 / art.width() as f32).min(height as f32 / art.height() as f32);
    let fit_width = ((art.width() as f32 * scale).round() as u32).clamp(1, width);
    let fit_height = ((art.height() as f32 * scale).round() as u32).clamp(1, height);
    let fitted = imageops::resize(art, fit_width, fit_height, imageops::FilterType::Triangle);

    let mut canvas = RgbaImage::from_pixel(
        width,
        height,
        scale_rgb(average_colour(&fitted), LETTERBOX_BRIGHTNESS),
    );
    imageops::overlay(
        &mut canvas,
        &fitted,
        ((width - fit_width) / 2) as i64,
        ((height - fit_height) / 2) as i64,
    );
    canvas
}

fn darken_bottom(canvas: &mut RgbaImage, band: u32) {
    let top = canvas.height() - band;
    for (_, y, pixel) in canvas.enumerate_pixels_mut() {
        if y >= top {
            *pixel = scale_rgb(*pixel, OVERLAY_BAND_BRIGHTNESS);
        }
    }
}

fn average_colour(image: &RgbaImage) -> Rgba<u8> {
    let count = (image.width() as u64 * image.height() as u64).max(1);
    let mut sums = [0u64; 3];
    for pixel in image.pixels() {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += channel as u64;
        }
    }
    let [r, g, b] = sums.map(|sum| (sum / count) as u8);
    Rgba([r, g, b, 255])
}

fn scale_rgb(pixel: Rgba<u8>, factor: f32) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = pixel;
    let scale = |channel: u8| (channel as f32 * factor).round() as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}
