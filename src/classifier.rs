use crate::canonical::CanonicalGlyph;
use crate::error::OcrError;

/// Number of letter classes (A-Z)
pub const NUM_CLASSES: usize = 26;

/// Trait that all glyph classifiers must implement
pub trait GlyphClassifier: Send + Sync {
    /// Returns the classifier identifier (e.g., "rten")
    fn name(&self) -> &'static str;

    /// Score a canonical glyph, returning one probability per class
    fn predict(&self, glyph: &CanonicalGlyph) -> Result<Vec<f32>, OcrError>;

    /// Classify a glyph into an uppercase letter
    fn classify(&self, glyph: &CanonicalGlyph) -> Result<char, OcrError> {
        let scores = self.predict(glyph)?;
        let label = argmax(&scores).ok_or_else(|| {
            OcrError::Classification("classifier returned no scores".to_string())
        })?;
        label_to_char(label).ok_or(OcrError::UnknownLabel(label))
    }
}

/// Index of the largest score; the lowest index wins ties
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Map a class index to its letter: 0 -> 'A', ..., 25 -> 'Z'
pub fn label_to_char(label: usize) -> Option<char> {
    if label < NUM_CLASSES {
        Some((b'A' + label as u8) as char)
    } else {
        None
    }
}

/// Inverse of [`label_to_char`]
#[cfg(test)]
pub fn char_to_label(c: char) -> Option<usize> {
    c.is_ascii_uppercase().then(|| (c as u8 - b'A') as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScoresClassifier(Vec<f32>);

    impl GlyphClassifier for ScoresClassifier {
        fn name(&self) -> &'static str {
            "scores"
        }

        fn predict(&self, _glyph: &CanonicalGlyph) -> Result<Vec<f32>, OcrError> {
            Ok(self.0.clone())
        }
    }

    fn blank_glyph() -> CanonicalGlyph {
        let image = image::GrayImage::new(1, 1);
        let bbox = crate::segmentation::BoundingBox {
            left: 0,
            top: 0,
            right: 1,
            bottom: 1,
        };
        crate::canonical::canonicalize(&image, &bbox)
    }

    #[test]
    fn test_label_mapping_is_a_bijection() {
        let letters: Vec<char> = (0..NUM_CLASSES).filter_map(label_to_char).collect();
        assert_eq!(letters.iter().collect::<String>(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ");

        for label in 0..NUM_CLASSES {
            let c = label_to_char(label).unwrap();
            assert_eq!(c as u32, label as u32 + 65);
            assert_eq!(char_to_label(c), Some(label));
        }
        assert_eq!(label_to_char(26), None);
    }

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.4, 0.2, 0.4]), Some(0));
        assert_eq!(argmax(&[0.0, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_classify_maps_best_score_to_letter() {
        let mut scores = vec![0.0; NUM_CLASSES];
        scores[7] = 0.9;
        let classifier = ScoresClassifier(scores);
        assert_eq!(classifier.classify(&blank_glyph()).unwrap(), 'H');
    }

    #[test]
    fn test_classify_rejects_out_of_range_label() {
        let mut scores = vec![0.0; NUM_CLASSES + 1];
        scores[NUM_CLASSES] = 1.0;
        let classifier = ScoresClassifier(scores);
        assert!(matches!(
            classifier.classify(&blank_glyph()),
            Err(OcrError::UnknownLabel(26))
        ));
    }

    #[test]
    fn test_classify_rejects_empty_scores() {
        let classifier = ScoresClassifier(Vec::new());
        assert!(matches!(
            classifier.classify(&blank_glyph()),
            Err(OcrError::Classification(_))
        ));
    }
}
