//! Individual normalization steps

pub mod grayscale;
pub mod polarity;
pub mod threshold;
