//! Tesseract command-line engine
//!
//! Runs the `tesseract` executable on a temporary PNG copy of the
//! preprocessed image and reads the recognized text from its stdout.

use crate::config::Config;
use crate::engine::{OcrEngine, RecognitionParams};
use crate::error::OcrError;
use image::GrayImage;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Stderr fragments Tesseract prints when a traineddata file is missing
const MISSING_LANGUAGE_MARKERS: [&str; 2] =
    ["Failed loading language", "Error opening data file"];

/// Tesseract OCR engine driven through its CLI
pub struct TesseractEngine {
    /// Executable to run
    command: PathBuf,
    /// Optional tessdata directory override
    tessdata_path: Option<String>,
}

impl TesseractEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            tessdata_path: config.tessdata_path.clone(),
        }
    }

    fn build_command(&self, image_path: &Path, params: &RecognitionParams) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&params.language)
            .arg("--oem")
            .arg(params.engine_mode.to_string())
            .arg("--psm")
            .arg(params.page_seg_mode.to_string());
        if let Some(dir) = &self.tessdata_path {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }

    /// Write the image to a temporary PNG the executable can read
    fn write_temp_png(&self, image: &GrayImage) -> Result<tempfile::NamedTempFile, OcrError> {
        let mut png_data = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut png_data),
                image::ImageFormat::Png,
            )
            .map_err(|e| OcrError::Recognition(format!("Failed to encode PNG: {}", e)))?;

        let mut temp_file = tempfile::Builder::new()
            .prefix("ocr-extract-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Recognition(format!("Failed to create temp file: {}", e)))?;

        temp_file
            .write_all(&png_data)
            .and_then(|_| temp_file.flush())
            .map_err(|e| OcrError::Recognition(format!("Failed to write temp file: {}", e)))?;

        Ok(temp_file)
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR through the installed command-line binary"
    }

    fn recognize(
        &self,
        image: &GrayImage,
        params: &RecognitionParams,
    ) -> Result<String, OcrError> {
        let temp_file = self.write_temp_png(image)?;
        let mut cmd = self.build_command(temp_file.path(), params);

        tracing::debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                "tesseract not found at {}",
                self.command.display()
            )),
            _ => OcrError::EngineUnavailable(format!(
                "failed to run {}: {}",
                self.command.display(),
                e
            )),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            if MISSING_LANGUAGE_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(OcrError::LanguageUnavailable {
                    language: params.language.clone(),
                });
            }
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if !stderr.trim().is_empty() {
            tracing::debug!("tesseract: {}", stderr.trim());
        }

        String::from_utf8(output.stdout)
            .map_err(|e| OcrError::Recognition(format!("Invalid UTF-8 output: {}", e)))
    }
}
