//! Assay data ingestion: workbook loading via calamine and analyte layout
//! handling.

pub mod error;
pub mod layout;
pub mod workbook;

pub use error::IngestError;
pub use layout::load_layout;
pub use workbook::{probe_workbook, read_workbook};
