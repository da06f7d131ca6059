//! Core assay-plate transformations.
//!
//! The pipeline per sheet: [`normalize`] classifies every sample identifier
//! and reorders columns, [`reconcile`] forward-fills demographics across
//! each patient's row block, and [`build_plot_specs`] turns the reconciled
//! table into renderable per-patient dose-response chart specs.

pub mod classify;
pub mod error;
pub mod normalize;
pub mod plot;
pub mod reconcile;
pub mod title;

pub use classify::{ParsedIdentifier, VISIT_NA, classify};
pub use error::CoreError;
pub use normalize::{
    DILUTION_COLUMN, NormalizeOutcome, PATIENT_ID_COLUMN, VISIT_COLUMN, normalize,
};
pub use plot::{PlotSpec, VisitSeries, build_plot_specs};
pub use reconcile::{ReconcileOutcome, reconcile};
pub use title::{PatientDemographics, compose_title};
