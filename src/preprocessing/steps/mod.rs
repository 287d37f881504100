//! Individual preprocessing steps

pub mod clahe;
pub mod denoise;
pub mod grayscale;
pub mod threshold;
