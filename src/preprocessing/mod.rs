//! Image normalization ahead of glyph segmentation
//!
//! Turns a decoded upload into a binary image with bright strokes on a dark
//! background, which is what the segmenter and the classifier expect.

pub mod pipeline;
pub mod steps;

pub use pipeline::Pipeline;
