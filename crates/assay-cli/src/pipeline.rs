//! The per-workbook processing pipeline.
//!
//! Stages per sheet, in order: normalize (classify identifiers, reorder
//! columns), reconcile demographics, export the cleaned table, build and
//! render plot specs. A sheet-fatal error (missing identifier column,
//! unwritable export) is captured in that sheet's summary and the run
//! continues with the next sheet.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, info_span, warn};

use assay_core::{PATIENT_ID_COLUMN, build_plot_specs, normalize, reconcile};
use assay_ingest::read_workbook;
use assay_model::{PipelineConfig, SheetTable};
use assay_report::{render_plot, write_sheet_export};

use crate::types::{RunResult, SheetSummary};

/// Everything needed for one run.
#[derive(Debug)]
pub struct RunOptions {
    pub workbook: PathBuf,
    pub config: PipelineConfig,
    /// Report without writing exports or plot images.
    pub dry_run: bool,
}

/// Process every sheet of a workbook.
pub fn run(options: &RunOptions) -> Result<RunResult> {
    let tables = read_workbook(&options.workbook, options.config.header_row)
        .context("read workbook")?;
    if tables.is_empty() {
        warn!(workbook = %options.workbook.display(), "workbook has no readable sheets");
    }
    Ok(process_sheets(&tables, options))
}

/// Process already-loaded sheet tables. A sheet-fatal error is captured in
/// that sheet's summary and the remaining sheets still run.
pub fn process_sheets(tables: &[SheetTable], options: &RunOptions) -> RunResult {
    let mut sheets = Vec::with_capacity(tables.len());
    for table in tables {
        let sheet_span = info_span!("sheet", name = %table.name());
        let _sheet_guard = sheet_span.enter();
        match process_sheet(table, &options.config, options.dry_run) {
            Ok(summary) => sheets.push(summary),
            Err(sheet_error) => {
                error!(sheet = %table.name(), error = %sheet_error, "sheet failed");
                sheets.push(SheetSummary::failed(table.name(), format!("{sheet_error:#}")));
            }
        }
    }

    let has_errors = sheets.iter().any(|summary| summary.error.is_some());
    RunResult {
        workbook: options.workbook.clone(),
        output_root: options.config.output_root.clone(),
        sheets,
        has_errors,
    }
}

/// Process one sheet: normalize, reconcile, export, plot.
pub fn process_sheet(
    sheet: &SheetTable,
    config: &PipelineConfig,
    dry_run: bool,
) -> Result<SheetSummary> {
    let outcome = normalize(sheet, &config.identifier_column)?;
    let mut table = outcome.table;

    let reconciled = reconcile(&mut table, &config.demographics);
    debug!(
        applied = reconciled.applied,
        anchors = reconciled.anchors,
        rows_before_first_anchor = reconciled.rows_before_first_anchor,
        "demographics reconciled"
    );

    let export = if dry_run {
        None
    } else {
        let path = write_sheet_export(&table, &config.output_root)?;
        info!(path = %path.display(), "export complete");
        Some(path)
    };

    let specs = build_plot_specs(
        &table,
        &config.analytes,
        &config.demographics,
        &config.output_root,
        &config.plot_extension,
    )?;

    let mut plots_rendered = 0usize;
    if config.render_plots && !dry_run {
        for spec in &specs {
            // One failed image must not abort the sheet.
            match render_plot(spec, config.plot_size) {
                Ok(true) => {
                    info!(title = %spec.title, "plot written");
                    plots_rendered += 1;
                }
                Ok(false) => {}
                Err(render_error) => {
                    error!(
                        path = %spec.output_path.display(),
                        error = %render_error,
                        "plot rendering failed"
                    );
                }
            }
        }
    }

    Ok(SheetSummary {
        sheet: table.name().to_string(),
        rows: table.row_count(),
        skipped_rows: outcome.skipped_rows,
        patients: distinct_patients(&table),
        export,
        plots_built: specs.len(),
        plots_rendered,
        error: None,
    })
}

fn distinct_patients(table: &SheetTable) -> usize {
    let Some(index) = table.column_index(PATIENT_ID_COLUMN) else {
        return 0;
    };
    let mut patients = HashSet::new();
    for row in 0..table.row_count() {
        patients.insert(table.cell(row, index).export_text());
    }
    patients.len()
}
