//! Fakes shared by the unit tests.
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use image::RgbaImage;

use crate::{DisplayMode, Item, ItemId, ItemSource, RenderBackend, RenderError};

#[derive(Debug, Clone, PartialEq)]
pub struct TestItem(pub u64);
impl Item for TestItem {
    fn id(&self) -> ItemId {
        ItemId(self.0)
    }
}

/// A playlist of `TestItem(i)` at index `i`.
pub struct FakeSource {
    pub items: Vec<TestItem>,
    pub cursor: usize,
}
impl FakeSource {
    pub fn with_items(count: u64, cursor: usize) -> Self {
        Self {
            items: (0..count).map(TestItem).collect(),
            cursor,
        }
    }
}
impl ItemSource<TestItem> for FakeSource {
    fn item_at(&self, offset: i32) -> Option<TestItem> {
        let index = self.cursor.checked_add_signed(offset as isize)?;
        self.items.get(index).cloned()
    }

    fn current_cursor(&self) -> usize {
        self.cursor
    }
}

/// Renders a solid image whose red channel is the item id. Item 13 always fails.
pub struct SolidBackend {
    pub renders: Arc<AtomicUsize>,
}
impl RenderBackend<TestItem> for SolidBackend {
    fn render_image(
        &mut self,
        item: &TestItem,
        _mode: DisplayMode,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if item.0 == 13 {
            return Err(RenderError::Backend {
                id: item.id(),
                message: "unlucky".to_string(),
            });
        }
        Ok(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([item.0 as u8, 0, 0, 255]),
        ))
    }
}
