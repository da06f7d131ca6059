//! Pipeline configuration.
//!
//! The original scripts kept these as module-level variables; here every
//! option is enumerated on one structure passed into the pipeline entry
//! point.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The demographic columns reconciled across each patient's row block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicColumns {
    /// The anchor column. A non-missing value here marks the first row of a
    /// patient block; reconciliation is a no-op when this column is absent.
    pub anchor: String,
    /// Columns propagated from the anchor row across the rest of the block.
    /// Plot titles read these positionally: the anchor fills the hospital
    /// slot, the first dependent the age slot, the second the gender slot.
    pub dependents: Vec<String>,
}

impl Default for DemographicColumns {
    fn default() -> Self {
        Self {
            anchor: "Hospital".to_string(),
            dependents: vec!["Age".to_string(), "Gender".to_string()],
        }
    }
}

impl DemographicColumns {
    /// Anchor plus dependents, anchor first.
    pub fn all(&self) -> Vec<&str> {
        let mut columns = Vec::with_capacity(1 + self.dependents.len());
        columns.push(self.anchor.as_str());
        columns.extend(self.dependents.iter().map(String::as_str));
        columns
    }
}

/// All options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the free-text sample identifier column.
    pub identifier_column: String,
    /// Demographic columns to reconcile.
    pub demographics: DemographicColumns,
    /// Ordered analyte column names to plot. Duplicates are harmless.
    pub analytes: Vec<String>,
    /// Root directory for exports and per-sheet plot directories.
    pub output_root: PathBuf,
    /// Zero-based index of the header row within each sheet. The source
    /// workbooks carry a plate banner on the first physical row.
    pub header_row: usize,
    /// Plot image size in pixels.
    pub plot_size: (u32, u32),
    /// Plot image extension (plotters bitmap backend).
    pub plot_extension: String,
    /// When false, plot specs are still built and counted but not rendered.
    pub render_plots: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            identifier_column: "Sample ID".to_string(),
            demographics: DemographicColumns::default(),
            analytes: Vec::new(),
            output_root: PathBuf::from("."),
            header_row: 1,
            plot_size: (960, 720),
            plot_extension: "png".to_string(),
            render_plots: true,
        }
    }
}
