//! Error types for report outputs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from writing exports and rendering plots.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Could not create an output directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Could not write the tab-separated sheet export.
    #[error("failed to write export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The chart backend failed. The backend error type is generic over the
    /// drawing area, so only its message is carried.
    #[error("failed to render plot {path}: {message}")]
    Render { path: PathBuf, message: String },
}
