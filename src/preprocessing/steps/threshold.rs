use crate::error::OcrError;
use image::{DynamicImage, GrayImage, Luma};

/// Pixels strictly above this value become foreground
pub const BINARY_THRESHOLD: u8 = 128;

/// Binarize with a fixed global cutoff
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    let gray = image.to_luma8();
    Ok(DynamicImage::ImageLuma8(binarize(&gray, BINARY_THRESHOLD)))
}

fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        if img.get_pixel(x, y).0[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
