//! Canonical 28x28 glyph form expected by the classifier

use crate::preprocessing::steps::polarity;
use crate::segmentation::BoundingBox;
use image::{imageops, imageops::FilterType, GrayImage};

/// Side of the square canvas fed to the classifier
pub const CANVAS_SIZE: u32 = 28;
/// Longest side a glyph may have once placed on the canvas
pub const MAX_GLYPH_SIDE: u32 = 20;

/// A glyph ready for classification: row-major, values in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalGlyph {
    pixels: Vec<f32>,
}

impl CanonicalGlyph {
    /// Model input shape, including the leading batch dimension
    pub const SHAPE: [usize; 3] = [1, CANVAS_SIZE as usize, CANVAS_SIZE as usize];

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[cfg(test)]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.pixels[(y * CANVAS_SIZE + x) as usize]
    }
}

/// Crop `bbox` out of the normalized image and bring it into canonical form.
pub fn canonicalize(image: &GrayImage, bbox: &BoundingBox) -> CanonicalGlyph {
    let crop = imageops::crop_imm(image, bbox.left, bbox.top, bbox.width(), bbox.height())
        .to_image();

    let (width, height) = thumbnail_size(crop.width(), crop.height(), MAX_GLYPH_SIDE);
    let glyph = if (width, height) == crop.dimensions() {
        crop
    } else {
        imageops::resize(&crop, width, height, FilterType::Lanczos3)
    };

    let mut canvas = GrayImage::new(CANVAS_SIZE, CANVAS_SIZE);
    let left = (CANVAS_SIZE - glyph.width()) / 2;
    let top = (CANVAS_SIZE - glyph.height()) / 2;
    imageops::replace(&mut canvas, &glyph, left as i64, top as i64);

    // Resampling can shift the balance; re-apply polarity correction
    let canvas = polarity::invert_if_light(canvas);

    CanonicalGlyph {
        pixels: canvas.pixels().map(|p| p.0[0] as f32 / 255.0).collect(),
    }
}

/// Size of a `width`x`height` image shrunk to fit a `max`x`max` box.
///
/// Never upscales. The derived side is the floor or ceiling of its exact
/// value, whichever keeps the aspect ratio closer, and is at least 1.
fn thumbnail_size(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    if aspect <= 1.0 {
        let exact = max as f64 * aspect;
        let side = closest_side(exact, |n| (aspect - n / max as f64).abs());
        (side, max)
    } else {
        let exact = max as f64 / aspect;
        let side = closest_side(exact, |n| (aspect - max as f64 / n).abs());
        (max, side)
    }
}

fn closest_side(exact: f64, error: impl Fn(f64) -> f64) -> u32 {
    let floor = exact.floor();
    let ceil = exact.ceil();
    // An empty side would make the aspect error infinite
    let best = if floor == 0.0 || error(ceil) < error(floor) {
        ceil
    } else {
        floor
    };
    (best as u32).max(1)
}
