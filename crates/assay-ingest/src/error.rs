//! Error types for ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from workbook and layout loading.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The workbook file could not be opened or parsed.
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    /// A sheet has no header row at the configured position.
    #[error("sheet '{name}' has no header row at index {header_row}")]
    MissingHeaderRow { name: String, header_row: usize },
    /// The analyte layout file could not be read.
    #[error("failed to read layout file {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
