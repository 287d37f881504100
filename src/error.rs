use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Input image does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Cannot read input image {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load image: {0}")]
    Decode(String),

    #[error("Preprocessing failed: {0}")]
    Preprocessing(String),

    #[error("No image to process")]
    NoImage,

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Language pack not available: {language}")]
    LanguageUnavailable { language: String },

    #[error("OCR failed: {0}")]
    Recognition(String),

    #[error("No text recognized")]
    NoTextRecognized,

    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OcrError {
    /// Short machine-friendly code, used in run reports
    pub fn code(&self) -> &'static str {
        match self {
            OcrError::InputNotFound(_) => "INPUT_NOT_FOUND",
            OcrError::InputUnreadable { .. } => "INPUT_UNREADABLE",
            OcrError::Decode(_) => "DECODE_ERROR",
            OcrError::Preprocessing(_) => "PREPROCESSING_ERROR",
            OcrError::NoImage => "NO_IMAGE",
            OcrError::EngineUnavailable(_) => "ENGINE_UNAVAILABLE",
            OcrError::LanguageUnavailable { .. } => "LANGUAGE_UNAVAILABLE",
            OcrError::Recognition(_) => "RECOGNITION_ERROR",
            OcrError::NoTextRecognized => "NO_TEXT",
            OcrError::Output { .. } => "OUTPUT_ERROR",
        }
    }
}
