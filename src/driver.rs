//! One end-to-end run: check the input, preprocess, recognize, save

use crate::config::Config;
use crate::engine::{self, OcrEngine};
use crate::error::OcrError;
use crate::preprocessing::{self, StepTiming};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Text must be longer than this many characters to be saved
pub const MIN_SAVED_CHARS: usize = 5;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Text written to the output file
    Saved,
    /// Text recognized but too short to be worth saving
    TooShort,
    /// Engine ran and found nothing
    NoText,
    /// Preprocessing or recognition failed
    Failed,
}

/// Summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub input_bytes: u64,
    pub engine: &'static str,
    pub language: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub threshold: Option<u8>,
    pub preprocessing_time_ms: Option<u64>,
    pub steps: Vec<StepTiming>,
    pub preprocessing_error: Option<String>,
    pub outcome: Outcome,
    pub chars: usize,
    pub error: Option<String>,
    pub error_code: Option<&'static str>,
    pub output: Option<PathBuf>,
}

/// Size of the input image in bytes; fails early when it is missing
fn input_size(path: &Path) -> Result<u64, OcrError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::error!("Input image does not exist: {}", path.display());
            Err(OcrError::InputNotFound(path.to_path_buf()))
        }
        Err(source) => {
            tracing::error!("Cannot read input image {}: {}", path.display(), source);
            Err(OcrError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Process the configured image end to end
///
/// Only an inaccessible input or a failed write to the output file is returned
/// as an error; every other failure is logged and recorded in the report.
pub fn run(config: &Config, engine: &dyn OcrEngine) -> Result<RunReport, OcrError> {
    let input_bytes = input_size(&config.input)?;
    tracing::info!("Processing: {}", config.input.display());
    tracing::info!("Image size: {} bytes", input_bytes);

    let mut report = RunReport {
        input: config.input.clone(),
        input_bytes,
        engine: engine.name(),
        language: config.language.clone(),
        width: None,
        height: None,
        threshold: None,
        preprocessing_time_ms: None,
        steps: Vec::new(),
        preprocessing_error: None,
        outcome: Outcome::Failed,
        chars: 0,
        error: None,
        error_code: None,
        output: None,
    };

    tracing::info!("Preprocessing image...");
    let preprocessed = match preprocessing::preprocess(&config.input) {
        Ok(result) => {
            report.width = Some(result.width);
            report.height = Some(result.height);
            report.threshold = Some(result.threshold);
            report.preprocessing_time_ms = Some(result.total_time_ms);
            report.steps = result.steps.clone();
            Some(result)
        }
        Err(e) => {
            tracing::error!("{}", e);
            report.preprocessing_error = Some(e.to_string());
            None
        }
    };

    tracing::info!("Extracting text...");
    let image = preprocessed.as_ref().map(|p| &p.image);
    match engine::extract_text(engine, image, &config.language) {
        Ok(text) => {
            report.chars = text.chars().count();
            if report.chars > MIN_SAVED_CHARS {
                save_text(&config.output, &text)?;
                tracing::info!("Text saved to {}", config.output.display());
                report.outcome = Outcome::Saved;
                report.output = Some(config.output.clone());
            } else {
                tracing::warn!("Not saved: text too short ({} characters)", report.chars);
                report.outcome = Outcome::TooShort;
            }
        }
        Err(OcrError::NoTextRecognized) => {
            tracing::warn!("Not saved: no text recognized");
            report.outcome = Outcome::NoText;
            report.error_code = Some(OcrError::NoTextRecognized.code());
        }
        Err(e) => {
            tracing::error!("{}", e);
            report.outcome = Outcome::Failed;
            report.error_code = Some(e.code());
            report.error = Some(e.to_string());
        }
    }

    Ok(report)
}

/// Write recognized text as UTF-8, replacing any previous content
fn save_text(path: &Path, text: &str) -> Result<(), OcrError> {
    fs::write(path, text).map_err(|source| OcrError::Output {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the run report as pretty-printed JSON
pub fn write_report(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
