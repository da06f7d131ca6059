//! Per-patient plot-spec building.
//!
//! Partitions a reconciled table by patient, restricts each patient to rows
//! with a dilution, groups by visit, and emits one renderable [`PlotSpec`]
//! per (patient, analyte). Patients without dilution data and analytes
//! without values are skipped and logged, never errors: a gap in one
//! patient's data must not abort the sheet.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use assay_model::{DemographicColumns, SheetTable, TableError};

use crate::normalize::{DILUTION_COLUMN, PATIENT_ID_COLUMN, VISIT_COLUMN};
use crate::title::{PatientDemographics, compose_title};

/// One visit's dose-response series, ordered by dilution.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitSeries {
    pub visit: String,
    pub points: Vec<(f64, f64)>,
}

/// Everything the renderer needs for one chart. Both axes are logarithmic;
/// the x-range is padded to half the minimum and double the maximum dilution
/// so edge points are not clipped at the plot border.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub patient_id: String,
    pub analyte: String,
    pub title: String,
    pub series: Vec<VisitSeries>,
    pub x_range: (f64, f64),
    pub output_path: PathBuf,
}

/// Build plot specs for every (patient, analyte) pair with data.
///
/// Patients keep their first-appearance order in the sheet so emission is
/// deterministic. Output paths follow
/// `<output_root>/<sheet>/<sheet>-<patient_id>-<analyte>.<extension>`.
///
/// # Errors
///
/// `TableError::ColumnNotFound` when the table is not a normalized table
/// (missing the `patient_id`/`visit`/`dilution` columns).
pub fn build_plot_specs(
    table: &SheetTable,
    analytes: &[String],
    demographics: &DemographicColumns,
    output_root: &Path,
    extension: &str,
) -> Result<Vec<PlotSpec>, TableError> {
    let patient_index = table.require_column(PATIENT_ID_COLUMN)?;
    let visit_index = table.require_column(VISIT_COLUMN)?;
    let dilution_index = table.require_column(DILUTION_COLUMN)?;

    let analyte_columns: Vec<(&str, usize)> = analytes
        .iter()
        .filter_map(|analyte| match table.column_index(analyte) {
            Some(index) => Some((analyte.as_str(), index)),
            None => {
                warn!(
                    sheet = table.name(),
                    analyte = %analyte,
                    "analyte column absent, no plots for it"
                );
                None
            }
        })
        .collect();

    let plot_dir = output_root.join(table.name());
    let mut specs = Vec::new();
    for (patient_id, rows) in partition_by_patient(table, patient_index) {
        // Only rows carrying a dilution can be placed on the x-axis.
        let dilution_rows: Vec<(usize, f64)> = rows
            .iter()
            .filter_map(|&row| {
                table
                    .cell(row, dilution_index)
                    .as_f64()
                    .map(|dilution| (row, dilution))
            })
            .collect();
        if dilution_rows.is_empty() {
            info!(patient = %patient_id, "no dilution information, patient skipped");
            continue;
        }

        let x_range = padded_range(dilution_rows.iter().map(|&(_, dilution)| dilution));
        let patient_demographics = demographics_for_row(table, rows[0], demographics);

        for &(analyte, analyte_index) in &analyte_columns {
            let series = visit_series(table, &dilution_rows, visit_index, analyte_index);
            if series.is_empty() {
                info!(patient = %patient_id, analyte, "no data for analyte, plot skipped");
                continue;
            }
            let title = compose_title(&patient_id, &patient_demographics, analyte);
            let file_name = format!("{}-{}-{}.{}", table.name(), patient_id, analyte, extension);
            debug!(patient = %patient_id, analyte, title = %title, "plot spec built");
            specs.push(PlotSpec {
                patient_id: patient_id.clone(),
                analyte: analyte.to_string(),
                title,
                series,
                x_range,
                output_path: plot_dir.join(file_name),
            });
        }
    }
    Ok(specs)
}

/// Group row indices by patient id, preserving first-appearance order.
fn partition_by_patient(table: &SheetTable, patient_index: usize) -> Vec<(String, Vec<usize>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for row in 0..table.row_count() {
        let patient_id = table.cell(row, patient_index).export_text();
        groups
            .entry(patient_id.clone())
            .or_insert_with(|| {
                order.push(patient_id.clone());
                Vec::new()
            })
            .push(row);
    }
    order
        .into_iter()
        .map(|patient_id| {
            let rows = groups.remove(&patient_id).unwrap_or_default();
            (patient_id, rows)
        })
        .collect()
}

/// One series per visit over the dilution-indexed rows, each ordered by
/// dilution. Rows without a value in the analyte column contribute nothing.
fn visit_series(
    table: &SheetTable,
    dilution_rows: &[(usize, f64)],
    visit_index: usize,
    analyte_index: usize,
) -> Vec<VisitSeries> {
    let mut by_visit: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for &(row, dilution) in dilution_rows {
        let Some(intensity) = table.cell(row, analyte_index).as_f64() else {
            continue;
        };
        let visit = table.cell(row, visit_index).export_text();
        by_visit.entry(visit).or_default().push((dilution, intensity));
    }
    by_visit
        .into_iter()
        .map(|(visit, mut points)| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            VisitSeries { visit, points }
        })
        .collect()
}

fn padded_range(dilutions: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for dilution in dilutions {
        min = min.min(dilution);
        max = max.max(dilution);
    }
    (min / 2.0, max * 2.0)
}

/// Title fields come from the demographic columns by position: the anchor
/// fills the hospital slot, the first dependent the age slot, the second the
/// gender slot. Renaming the columns does not lose the title fields.
fn demographics_for_row(
    table: &SheetTable,
    row: usize,
    demographics: &DemographicColumns,
) -> PatientDemographics {
    let text_cell = |column: &str| {
        table
            .cell_by_name(row, column)
            .and_then(|cell| cell.as_text())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    };
    let hospital = text_cell(&demographics.anchor);
    let age = demographics
        .dependents
        .first()
        .and_then(|column| table.cell_by_name(row, column))
        .and_then(|cell| cell.as_f64());
    let gender = demographics
        .dependents
        .get(1)
        .and_then(|column| text_cell(column));
    PatientDemographics {
        gender,
        age,
        hospital,
    }
}
