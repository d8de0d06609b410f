use crate::error::OcrError;
use image::{DynamicImage, GrayImage, Luma};

/// ITU-R 601-2 luma weights in 16.16 fixed point (0.299, 0.587, 0.114)
const R_WEIGHT: u32 = 19595;
const G_WEIGHT: u32 = 38470;
const B_WEIGHT: u32 = 7471;
const ROUNDING: u32 = 0x8000;

/// Convert to single-channel grayscale with ITU-R 601-2 weights.
///
/// The polarity and threshold cutoffs downstream are tuned against this
/// conversion, so colour uploads must not go through Rec. 709 luma.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    if let DynamicImage::ImageLuma8(gray) = image {
        return Ok(DynamicImage::ImageLuma8(gray));
    }

    let rgb = image.to_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    });
    Ok(DynamicImage::ImageLuma8(gray))
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT + ROUNDING) >> 16) as u8
}
