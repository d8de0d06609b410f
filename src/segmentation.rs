//! Glyph segmentation by connected-component labeling

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::BTreeMap;

/// Axis-aligned extent of one glyph. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    fn from_pixel(x: u32, y: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + 1,
            bottom: y + 1,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x + 1);
        self.bottom = self.bottom.max(y + 1);
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Find every 4-connected foreground region (pixel > 0) and return its
/// bounding box, ordered by left edge.
///
/// Boxes sharing a left edge keep the raster-scan order of their labels.
pub fn segment(binary: &GrayImage) -> Vec<BoundingBox> {
    if binary.width() == 0 || binary.height() == 0 {
        return Vec::new();
    }

    // Labeling joins equal-valued neighbours, so collapse foreground first
    let mask = GrayImage::from_fn(binary.width(), binary.height(), |x, y| {
        if binary.get_pixel(x, y).0[0] > 0 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    let labels = connected_components(&mask, Connectivity::Four, Luma([0u8]));

    let mut regions: BTreeMap<u32, BoundingBox> = BTreeMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0];
        if label == 0 {
            continue;
        }
        regions
            .entry(label)
            .and_modify(|b| b.include(x, y))
            .or_insert_with(|| BoundingBox::from_pixel(x, y));
    }

    let mut boxes: Vec<BoundingBox> = regions.into_values().collect();
    boxes.sort_by_key(|b| b.left);

    tracing::debug!("Segmented {} glyph(s)", boxes.len());
    boxes
}
