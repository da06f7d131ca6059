//! Shared data model for the assay-plate pipeline: tagged cell values,
//! row-major sheet tables, and the run configuration.

pub mod cell;
pub mod config;
pub mod table;

pub use cell::{CellValue, format_numeric};
pub use config::{DemographicColumns, PipelineConfig};
pub use table::{SheetTable, TableError, normalize_header};
