use crate::error::OcrError;
use image::GrayImage;

/// Tesseract engine mode 3: whatever the installed engine supports
pub const ENGINE_MODE: u8 = 3;
/// Tesseract page segmentation mode 6: a single uniform block of text
pub const PAGE_SEG_MODE: u8 = 6;

/// Settings passed to an engine for one recognition call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionParams {
    pub language: String,
    pub engine_mode: u8,
    pub page_seg_mode: u8,
}

impl RecognitionParams {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            engine_mode: ENGINE_MODE,
            page_seg_mode: PAGE_SEG_MODE,
        }
    }
}

/// Trait that all OCR engines must implement
pub trait OcrEngine {
    /// Returns the engine identifier (e.g., "tesseract", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in a preprocessed image, untrimmed
    fn recognize(&self, image: &GrayImage, params: &RecognitionParams) -> Result<String, OcrError>;
}

/// Run OCR on a preprocessed image
///
/// A missing image fails with [`OcrError::NoImage`] without touching the
/// engine. Recognized text is trimmed; nothing left after trimming is
/// reported as [`OcrError::NoTextRecognized`].
pub fn extract_text(
    engine: &dyn OcrEngine,
    image: Option<&GrayImage>,
    language: &str,
) -> Result<String, OcrError> {
    let image = image.ok_or(OcrError::NoImage)?;

    let params = RecognitionParams::new(language);
    tracing::debug!(
        "Running {} (lang {}, oem {}, psm {}) on {}x{} image",
        engine.name(),
        params.language,
        params.engine_mode,
        params.page_seg_mode,
        image.width(),
        image.height()
    );

    let raw = engine.recognize(image, &params)?;
    tracing::info!("Text extracted ({} characters)", raw.chars().count());

    let text = raw.trim();
    if text.is_empty() {
        return Err(OcrError::NoTextRecognized);
    }
    Ok(text.to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Engine double returning a canned answer and counting calls
    pub struct FakeEngine {
        text: Option<String>,
        error: RefCell<Option<OcrError>>,
        pub calls: Cell<usize>,
        pub last_params: RefCell<Option<RecognitionParams>>,
    }

    impl FakeEngine {
        pub fn returning(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                error: RefCell::new(None),
                calls: Cell::new(0),
                last_params: RefCell::new(None),
            }
        }

        pub fn failing(err: OcrError) -> Self {
            Self {
                text: None,
                error: RefCell::new(Some(err)),
                calls: Cell::new(0),
                last_params: RefCell::new(None),
            }
        }
    }

    impl OcrEngine for FakeEngine {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn description(&self) -> &'static str {
            "Canned answers for tests"
        }

        fn recognize(
            &self,
            _image: &GrayImage,
            params: &RecognitionParams,
        ) -> Result<String, OcrError> {
            self.calls.set(self.calls.get() + 1);
            *self.last_params.borrow_mut() = Some(params.clone());
            match &self.text {
                Some(text) => Ok(text.clone()),
                None => Err(self
                    .error
                    .borrow_mut()
                    .take()
                    .unwrap_or_else(|| OcrError::Recognition("already failed".to_string()))),
            }
        }
    }
}
