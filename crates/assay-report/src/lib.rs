//! Assay pipeline outputs: tab-separated sheet exports and dose-response
//! chart rendering from [`assay_core::PlotSpec`]s.

pub mod error;
pub mod export;
pub mod render;

pub use error::ReportError;
pub use export::write_sheet_export;
pub use render::render_plot;
