use crate::error::OcrError;
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use super::steps;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Binarized image
    pub image: GrayImage,
    pub width: u32,
    pub height: u32,
    /// Otsu level chosen for binarization
    pub threshold: u8,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Decode an image file
pub fn load(path: &Path) -> Result<DynamicImage, OcrError> {
    image::open(path).map_err(|e| OcrError::Decode(format!("{}: {}", path.display(), e)))
}

/// Load an image and run it through the fixed pipeline
pub fn preprocess(path: &Path) -> Result<PreprocessingResult, OcrError> {
    let image = load(path)?;
    tracing::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Pipeline::new().process(image)
}

/// Fixed preprocessing pipeline:
/// grayscale, median denoise, CLAHE, Otsu threshold
#[derive(Debug, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, OcrError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();
        let (width, height) = (image.width(), image.height());

        let img = self.run_step(
            "grayscale",
            image,
            &mut steps_timing,
            steps::grayscale::apply,
        )?;
        let img = self.run_step("denoise", img, &mut steps_timing, steps::denoise::apply)?;
        let img = self.run_step("clahe", img, &mut steps_timing, steps::clahe::apply)?;
        let (img, threshold) =
            self.run_step("threshold", img, &mut steps_timing, steps::threshold::apply)?;

        if img.dimensions() != (width, height) {
            return Err(OcrError::Preprocessing(format!(
                "dimensions changed from {}x{} to {}x{}",
                width,
                height,
                img.width(),
                img.height()
            )));
        }

        let total_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "Preprocessing finished in {}ms (otsu level {})",
            total_time_ms,
            threshold
        );

        Ok(PreprocessingResult {
            image: img,
            width,
            height,
            threshold,
            total_time_ms,
            steps: steps_timing,
        })
    }

    fn run_step<I, O, F>(
        &self,
        name: &str,
        img: I,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<O, OcrError>
    where
        F: FnOnce(I) -> Result<O, OcrError>,
    {
        let step_start = Instant::now();
        let result = step_fn(img)?;
        let time_ms = step_start.elapsed().as_millis() as u64;
        tracing::debug!("Step {} took {}ms", name, time_ms);
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms,
        });
        Ok(result)
    }
}
