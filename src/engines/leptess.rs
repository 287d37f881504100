//! Leptess/Tesseract engine implementation
//!
//! In-process Tesseract through the tesseract-static crate (statically
//! linked, no executable needed). Traineddata is read from the configured
//! tessdata directory, or Tesseract's own default when none is set.

use crate::config::Config;
use crate::engine::{OcrEngine, RecognitionParams};
use crate::error::OcrError;
use image::GrayImage;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: Option<String>,
}

impl LeptessEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let tessdata_path = config.tessdata_path.clone();

        // Validate that the language loads by doing a test initialization
        let test_tess = Tesseract::new(tessdata_path.as_deref(), Some(&config.language))
            .map_err(|e| init_error(&config.language, e))?;
        drop(test_tess);

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            tessdata_path.as_deref().unwrap_or("default"),
            config.language
        );

        Ok(Self { tessdata_path })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Statically linked Tesseract library"
    }

    fn recognize(&self, image: &GrayImage, params: &RecognitionParams) -> Result<String, OcrError> {
        let (width, height) = image.dimensions();

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut bmp_data),
                image::ImageFormat::Bmp,
            )
            .map_err(|e| OcrError::Recognition(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let tess = Tesseract::new(self.tessdata_path.as_deref(), Some(&params.language))
            .map_err(|e| init_error(&params.language, e))?;

        // Engine mode is fixed at init time; the default build matches mode 3
        let mut tess = tess
            .set_variable("tessedit_pageseg_mode", &params.page_seg_mode.to_string())
            .map_err(|e| OcrError::Recognition(format!("Failed to set page mode: {}", e)))?;

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            OcrError::Recognition(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        tess = tess
            .recognize()
            .map_err(|e| OcrError::Recognition(format!("Failed to recognize text: {}", e)))?;

        tess.get_text()
            .map_err(|e| OcrError::Recognition(format!("Failed to get text: {}", e)))
    }
}

/// Tesseract only fails to initialize when the traineddata cannot be loaded
fn init_error(language: &str, err: impl std::fmt::Display) -> OcrError {
    tracing::debug!("Tesseract init failed: {}", err);
    OcrError::LanguageUnavailable {
        language: language.to_string(),
    }
}
