//! Reassembles classified glyphs into text, inferring word breaks from gaps

use crate::segmentation::BoundingBox;

/// Horizontal gap (pixels) above which a space is inserted
pub const SPACE_GAP: i64 = 10;

/// Returned instead of an empty string when no glyph was found
pub const NOTHING_RECOGNIZED: &str = "No characters recognized";

/// Accumulates characters left to right
#[derive(Debug, Default)]
pub struct TextAssembler {
    text: String,
    prev_right: Option<u32>,
}

impl TextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the character recognized inside `bbox`
    pub fn push(&mut self, bbox: &BoundingBox, symbol: char) {
        if let Some(prev_right) = self.prev_right {
            if bbox.left as i64 - prev_right as i64 > SPACE_GAP {
                self.text.push(' ');
            }
        }
        self.text.push(symbol);
        self.prev_right = Some(bbox.right);
    }

    /// The assembled text, or [`NOTHING_RECOGNIZED`] if nothing was pushed
    pub fn finish(self) -> String {
        if self.text.is_empty() {
            NOTHING_RECOGNIZED.to_string()
        } else {
            self.text
        }
    }
}
