//! CLI library components for the assay-plate pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;
