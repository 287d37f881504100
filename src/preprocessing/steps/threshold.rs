use crate::error::OcrError;
use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

/// Apply global Otsu binarization
///
/// The cutoff is the level that maximizes between-class variance of the
/// image's own histogram. Pixels above it become white (255), the rest
/// black (0). Returns the binarized image and the level used.
pub fn apply(image: GrayImage) -> Result<(GrayImage, u8), OcrError> {
    let level = otsu_level(&image);
    let binarized = threshold(&image, level, ThresholdType::Binary);
    Ok((binarized, level))
}
