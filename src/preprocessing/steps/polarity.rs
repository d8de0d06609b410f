use crate::error::OcrError;
use image::{imageops, DynamicImage, GrayImage};

/// Images brighter than this on average are treated as dark-on-light
pub const INVERT_MEAN_THRESHOLD: f64 = 127.0;

/// Make strokes bright on a dark background
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    Ok(DynamicImage::ImageLuma8(invert_if_light(image.to_luma8())))
}

/// Invert `image` when its mean intensity exceeds [`INVERT_MEAN_THRESHOLD`]
pub fn invert_if_light(mut image: GrayImage) -> GrayImage {
    if mean_intensity(&image) > INVERT_MEAN_THRESHOLD {
        imageops::invert(&mut image);
    }
    image
}

/// Mean pixel value; 0.0 for an empty image
pub fn mean_intensity(image: &GrayImage) -> f64 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = image.pixels().map(|p| p.0[0] as u64).sum();
    sum as f64 / count as f64
}
