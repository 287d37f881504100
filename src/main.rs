use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod driver;
mod engine;
mod engines;
mod error;
mod preprocessing;

use engines::EngineKind;

/// Output file written when enough text is recognized
pub const DEFAULT_OUTPUT: &str = "resultado_ocr.txt";
/// Tesseract language pack used when none is given
pub const DEFAULT_LANGUAGE: &str = "spa";

#[derive(Parser, Debug)]
#[command(name = "ocr-extract")]
#[command(about = "Clean up an image and extract its text with Tesseract")]
#[command(version)]
pub struct Args {
    /// Image file to process
    #[arg(env = "OCR_INPUT")]
    pub input: PathBuf,

    /// File the recognized text is written to
    #[arg(long, short, env = "OCR_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Language for OCR (e.g., "spa", "eng", "deu")
    #[arg(long, short, env = "OCR_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// OCR engine to use
    #[arg(
        long,
        env = "OCR_ENGINE",
        value_enum,
        default_value_t = EngineKind::Tesseract
    )]
    pub engine: EngineKind,

    /// Path to the tesseract executable
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: PathBuf,

    /// Path to tessdata directory (uses TESSDATA_PREFIX env var if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Write a JSON summary of the run to this path
    #[arg(long, env = "OCR_REPORT")]
    pub report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!("Starting ocr-extract v{}", env!("CARGO_PKG_VERSION"));

    let engine = engines::create(&config)?;
    let report = driver::run(&config, engine.as_ref())?;

    if let Some(path) = &config.report {
        driver::write_report(&report, path)?;
        tracing::info!("Run report written to {}", path.display());
    }

    if report.outcome == driver::Outcome::Failed {
        anyhow::bail!(
            "{}",
            report.error.as_deref().unwrap_or("text extraction failed")
        );
    }

    Ok(())
}
