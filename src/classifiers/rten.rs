//! rten classifier implementation
//!
//! Runs a converted EMNIST letters model with the pure-Rust rten runtime.
//! The model takes a `[1, 28, 28]` float tensor and produces `[1, 26]`
//! class probabilities.

use crate::canonical::CanonicalGlyph;
use crate::classifier::{GlyphClassifier, NUM_CLASSES};
use crate::error::OcrError;
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::NdTensor;
use std::path::Path;

/// Glyph classifier wrapping an rten model
pub struct RtenClassifier {
    model: Model,
}

impl RtenClassifier {
    /// Load the model file, failing if rten cannot parse it
    pub fn load(path: &Path) -> Result<Self, OcrError> {
        tracing::info!("Loading glyph classifier from {:?}...", path);

        let model = Model::load_file(path).map_err(|e| {
            OcrError::InitializationError(format!("Failed to load classifier model: {}", e))
        })?;

        Ok(Self { model })
    }
}

impl GlyphClassifier for RtenClassifier {
    fn name(&self) -> &'static str {
        "rten"
    }

    fn predict(&self, glyph: &CanonicalGlyph) -> Result<Vec<f32>, OcrError> {
        let input = NdTensor::from_data(CanonicalGlyph::SHAPE, glyph.pixels().to_vec());

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| OcrError::Classification(format!("Model run failed: {}", e)))?;

        let scores: NdTensor<f32, 2> = output.try_into().map_err(|_| {
            OcrError::Classification(
                "expected classifier output to be a 2-dim float tensor".to_string(),
            )
        })?;

        let (batch, classes) = (scores.size(0), scores.size(1));
        if batch != 1 || classes != NUM_CLASSES {
            return Err(OcrError::Classification(format!(
                "expected classifier output of shape [1, {}], got [{}, {}]",
                NUM_CLASSES, batch, classes
            )));
        }

        Ok(scores.to_vec())
    }
}
