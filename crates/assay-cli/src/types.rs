use std::path::PathBuf;

/// Outcome of one whole run.
#[derive(Debug)]
pub struct RunResult {
    pub workbook: PathBuf,
    pub output_root: PathBuf,
    pub sheets: Vec<SheetSummary>,
    pub has_errors: bool,
}

/// Outcome of one sheet.
#[derive(Debug)]
pub struct SheetSummary {
    pub sheet: String,
    /// Rows in the normalized table.
    pub rows: usize,
    /// Rows excluded for blank identifiers.
    pub skipped_rows: usize,
    /// Distinct patients in the sheet.
    pub patients: usize,
    /// Export path, when written.
    pub export: Option<PathBuf>,
    /// Plot specs built for the sheet.
    pub plots_built: usize,
    /// Plot images written.
    pub plots_rendered: usize,
    /// Sheet-fatal error, when the sheet could not be processed.
    pub error: Option<String>,
}

impl SheetSummary {
    pub fn failed(sheet: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            rows: 0,
            skipped_rows: 0,
            patients: 0,
            export: None,
            plots_built: 0,
            plots_rendered: 0,
            error: Some(error.into()),
        }
    }
}
