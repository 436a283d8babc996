use std::path::PathBuf;

use thiserror::Error;

/// Precondition failures that abort a run before any output is written.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Input directory not found: {}", .0.display())]
    MissingInputDir(PathBuf),

    #[error("Input CSV seems to have no data rows: {}", .0.display())]
    NoDataRows(PathBuf),

    #[error("No JSON files found in: {}", .0.display())]
    NoJsonFiles(PathBuf),

    #[error("Expected the input JSON to be an array of objects: {}", .0.display())]
    NotAnArray(PathBuf),

    #[error("Split count must be at least 1")]
    ZeroParts,
}
