use crate::assembler::TextAssembler;
use crate::canonical;
use crate::classifier::GlyphClassifier;
use crate::error::OcrError;
use crate::preprocessing::Pipeline;
use crate::segmentation;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Recognition result
#[derive(Debug, Clone)]
pub struct Recognition {
    pub text: String,
    pub glyph_count: usize,
}

/// Single-pass handwriting recognizer: normalize, segment, classify, assemble
pub struct Recognizer {
    pipeline: Pipeline,
    classifier: Arc<dyn GlyphClassifier>,
}

impl Recognizer {
    pub fn new(classifier: Arc<dyn GlyphClassifier>) -> Self {
        Self {
            pipeline: Pipeline::new(),
            classifier,
        }
    }

    /// Recognize the image stored at `path`
    pub fn recognize_file(&self, path: &Path) -> Result<Recognition, OcrError> {
        let bytes = std::fs::read(path)
            .map_err(|e| OcrError::Internal(format!("Failed to read upload: {}", e)))?;
        self.recognize_bytes(&bytes)
    }

    /// Recognize an encoded image
    pub fn recognize_bytes(&self, bytes: &[u8]) -> Result<Recognition, OcrError> {
        let start = Instant::now();

        let normalized = self.pipeline.process_bytes(bytes)?;
        for step in &normalized.steps {
            tracing::debug!("Step '{}' took {}ms", step.name, step.time_ms);
        }
        tracing::debug!("Normalization took {}ms", normalized.total_time_ms);

        let boxes = segmentation::segment(&normalized.image);

        let mut assembler = TextAssembler::new();
        for bbox in &boxes {
            let glyph = canonical::canonicalize(&normalized.image, bbox);
            let symbol = self.classifier.classify(&glyph)?;
            assembler.push(bbox, symbol);
        }

        let text = assembler.finish();
        tracing::debug!(
            "Recognized {} glyph(s) in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );

        Ok(Recognition {
            text,
            glyph_count: boxes.len(),
        })
    }
}
