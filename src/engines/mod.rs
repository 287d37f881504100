//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait for different
//! Tesseract backends. The in-process engine is conditionally compiled behind
//! the `engine-leptess` feature flag.

pub mod tesseract;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use clap::ValueEnum;

/// Engines that can be selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Tesseract command-line binary
    Tesseract,
    /// Statically linked Tesseract library
    Leptess,
}

/// Build the engine selected in the configuration
pub fn create(config: &Config) -> Result<Box<dyn OcrEngine>, OcrError> {
    let engine: Box<dyn OcrEngine> = match config.engine {
        EngineKind::Tesseract => Box::new(tesseract::TesseractEngine::new(config)),
        EngineKind::Leptess => create_leptess(config)?,
    };

    tracing::info!("Using {} engine: {}", engine.name(), engine.description());
    Ok(engine)
}

#[cfg(feature = "engine-leptess")]
fn create_leptess(config: &Config) -> Result<Box<dyn OcrEngine>, OcrError> {
    tracing::info!("Initializing leptess engine...");
    Ok(Box::new(leptess::LeptessEngine::new(config)?))
}

#[cfg(not(feature = "engine-leptess"))]
fn create_leptess(_config: &Config) -> Result<Box<dyn OcrEngine>, OcrError> {
    Err(OcrError::EngineUnavailable(
        "leptess engine not compiled in. Build with --features engine-leptess".to_string(),
    ))
}
