// Error taxonomy for the harness core.
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a run.
///
/// Per-case execution failures and output mismatches are ordinary data
/// (`ExecutionResult`, `Comparison`) and never surface here; every variant
/// below stops the run before or instead of producing a summary.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Code file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Test file not found: {}", .0.display())]
    MissingTestFile(PathBuf),

    #[error("Invalid test format in {}: {detail}", .path.display())]
    InvalidTestFormat { path: PathBuf, detail: String },

    #[error("Compilation failed")]
    CompilationFailed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
