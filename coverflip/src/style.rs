use std::hash::{Hash, Hasher};

use egui::{Color32, ecolor::Hsva};
use serde::{Deserialize, Serialize};

/// HSV color representation (hue 0-1, saturation 0-1, value 0-1).
pub type Hsv = [f32; 3];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Style {
    pub background_hsv: Hsv,
    pub text_hsv: Hsv,
    pub subtitle_hsv: Hsv,
}
impl Default for Style {
    fn default() -> Self {
        Self {
            background_hsv: [0.65, 0.40, 0.01],
            text_hsv: [0.0, 0.0, 1.0],
            subtitle_hsv: [0.0, 0.0, 0.75],
        }
    }
}
impl Style {
    pub fn background(&self) -> Color32 {
        hsv_to_color32(self.background_hsv)
    }

    pub fn text(&self) -> Color32 {
        hsv_to_color32(self.text_hsv)
    }

    pub fn subtitle(&self) -> Color32 {
        hsv_to_color32(self.subtitle_hsv)
    }

    pub fn background_rgba(&self) -> [u8; 4] {
        hsv_to_rgba(self.background_hsv)
    }
}

pub fn hsv_to_color32(hsv: Hsv) -> Color32 {
    Hsva::new(hsv[0], hsv[1], hsv[2], 1.0).into()
}

pub fn hsv_to_rgba(hsv: Hsv) -> [u8; 4] {
    Hsva::new(hsv[0], hsv[1], hsv[2], 1.0).to_srgba_unmultiplied()
}

/// Hashes a value and produces a pleasing colour from that hash.
pub fn hash_to_hsv(value: impl Hash) -> Hsv {
    const DISTINCT_COLOURS: u64 = 36_000;

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.hash(&mut hasher);
    let hash = hasher.finish();
    let hue = (hash % DISTINCT_COLOURS) as f32 / DISTINCT_COLOURS as f32;

    [hue, 0.75, 0.75]
}
