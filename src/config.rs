use crate::engines::EngineKind;
use crate::Args;
use std::path::PathBuf;

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub language: String,
    pub engine: EngineKind,
    pub tesseract_cmd: PathBuf,
    pub tessdata_path: Option<String>,
    pub report: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output: args.output,
            language: args.language,
            engine: args.engine,
            tesseract_cmd: args.tesseract_cmd,
            tessdata_path: args.tessdata_path,
            report: args.report,
        }
    }
}

impl Config {
    /// Configuration with the stock defaults for the given input
    #[cfg(test)]
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(crate::DEFAULT_OUTPUT),
            language: crate::DEFAULT_LANGUAGE.to_string(),
            engine: EngineKind::Tesseract,
            tesseract_cmd: PathBuf::from("tesseract"),
            tessdata_path: None,
            report: None,
        }
    }
}
