use crate::error::OcrError;
use image::{DynamicImage, GrayImage};

/// Convert image to 8-bit grayscale
/// Every later step works on a single luma channel
pub fn apply(image: DynamicImage) -> Result<GrayImage, OcrError> {
    Ok(image.into_luma8())
}
