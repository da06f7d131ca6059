//! Error types for core transformations.

use thiserror::Error;

/// Errors from normalization and classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Identifier string is empty after trimming.
    #[error("malformed identifier: empty after trimming")]
    MalformedIdentifier,
    /// The sheet lacks the configured identifier column. Sheet-fatal.
    #[error("sheet '{sheet}' is missing identifier column '{column}'")]
    MissingIdentifierColumn { sheet: String, column: String },
}
