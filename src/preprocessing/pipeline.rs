use crate::error::OcrError;
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::time::Instant;

use super::steps;

/// Timing information for a single normalization step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of normalization including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Binary image, strokes at 255 on a 0 background (not serialized)
    #[serde(skip)]
    pub image: GrayImage,
    /// Total normalization time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Normalization pipeline: grayscale, polarity correction, binarization
#[derive(Debug, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw upload bytes and normalize them
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<PreprocessingResult, OcrError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
        self.process(image)
    }

    /// Normalize an already decoded image
    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, OcrError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let mut img = image;
        img = self.run_step("grayscale", img, &mut steps_timing, steps::grayscale::apply)?;
        img = self.run_step("polarity", img, &mut steps_timing, steps::polarity::apply)?;
        img = self.run_step("threshold", img, &mut steps_timing, steps::threshold::apply)?;

        Ok(PreprocessingResult {
            image: img.into_luma8(),
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    fn run_step<F>(
        &self,
        name: &str,
        img: DynamicImage,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<DynamicImage, OcrError>
    where
        F: FnOnce(DynamicImage) -> Result<DynamicImage, OcrError>,
    {
        let step_start = Instant::now();
        let result = step_fn(img)?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_dark_strokes_on_light_background_become_bright() {
        let mut img = RgbImage::from_pixel(30, 30, Rgb([255, 255, 255]));
        for y in 10..20 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        let result = Pipeline::new()
            .process(DynamicImage::ImageRgb8(img))
            .unwrap();

        assert_eq!(result.image.get_pixel(15, 15).0[0], 255);
        assert_eq!(result.image.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_records_every_step() {
        let img = GrayImage::from_pixel(8, 8, Luma([0]));
        let result = Pipeline::new()
            .process(DynamicImage::ImageLuma8(img))
            .unwrap();

        let names: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["grayscale", "polarity", "threshold"]);
    }

    #[test]
    fn test_process_bytes_decodes_png() {
        let img = GrayImage::from_pixel(12, 6, Luma([255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let result = Pipeline::new().process_bytes(&bytes).unwrap();
        assert_eq!(result.image.dimensions(), (12, 6));
        assert!(result.image.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_process_bytes_rejects_garbage() {
        let err = Pipeline::new().process_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, OcrError::ImageDecode(_)));
    }
}
