use crate::{BitmapCache, CoverImage, Item, STORE_SIZE, SongWindow};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Where covers get painted. Coordinates are relative to the view's top-left corner.
pub trait Surface<T> {
    /// The part of the view that needs repainting.
    fn clip_bounds(&self) -> Rect;
    fn fill_background(&mut self, rgba: [u8; 4]);
    fn draw_image(&mut self, image: &T, x: f32, y: f32);
}

/// Paints the three slots side by side, shifted left by the scroll offset.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub background: [u8; 4],
}
impl Default for Renderer {
    fn default() -> Self {
        Self {
            background: [0, 0, 0, 255],
        }
    }
}
impl Renderer {
    /// Returns the number of covers drawn. Unknown items and cache misses leave their
    /// page blank.
    pub fn draw<I: Item, T: CoverImage>(
        &self,
        surface: &mut impl Surface<T>,
        window: &SongWindow<I>,
        cache: &BitmapCache<T>,
        scroll_offset: f32,
        viewport: [u32; 2],
    ) -> usize {
        surface.fill_background(self.background);

        let [width, height] = viewport.map(|v| v as f32);
        let clip = surface.clip_bounds().translated(scroll_offset, 0.0);

        let mut drawn = 0;
        for slot in 0..STORE_SIZE {
            let page_x = slot as f32 * width;
            let Some(item) = window.get(slot) else {
                continue;
            };
            if !clip.intersects(&Rect::new(page_x, 0.0, width, height)) {
                continue;
            }
            let Some(image) = cache.get(item.id()) else {
                continue;
            };

            let [image_width, image_height] = image.size().map(|v| v as f32);
            let x = page_x - scroll_offset + (width - image_width) / 2.0;
            let y = (height - image_height) / 2.0;
            surface.draw_image(image, x, y);
            drawn += 1;
        }
        drawn
    }
}
