//! Integration tests for the sheet-processing pipeline.

use std::fs;
use std::path::PathBuf;

use assay_cli::pipeline::{RunOptions, process_sheet, process_sheets};
use assay_model::{CellValue, PipelineConfig, SheetTable};

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn sample_sheet() -> SheetTable {
    let mut sheet = SheetTable::new(
        "Plate 1",
        vec![
            "Sample ID".to_string(),
            "Hospital".to_string(),
            "Age".to_string(),
            "Gender".to_string(),
            "IgG".to_string(),
        ],
    );
    sheet.push_row(vec![
        text("P1 V1 100"),
        text("H1"),
        CellValue::Number(30.0),
        text("F"),
        CellValue::Number(5.0),
    ]);
    sheet.push_row(vec![
        text("P1 V2 1000"),
        CellValue::Missing,
        CellValue::Missing,
        CellValue::Missing,
        CellValue::Number(7.0),
    ]);
    sheet.push_row(vec![
        text("CTRL"),
        CellValue::Missing,
        CellValue::Missing,
        CellValue::Missing,
        CellValue::Number(1.0),
    ]);
    sheet
}

fn config(output_root: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        analytes: vec!["IgG".to_string()],
        output_root: output_root.to_path_buf(),
        // Tables built in tests have no banner row.
        header_row: 0,
        render_plots: false,
        ..PipelineConfig::default()
    }
}

#[test]
fn process_sheet_exports_and_builds_specs() {
    let dir = tempfile::tempdir().unwrap();
    let summary = process_sheet(&sample_sheet(), &config(dir.path()), false).unwrap();

    assert!(summary.error.is_none());
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.skipped_rows, 0);
    assert_eq!(summary.patients, 2);
    // CTRL has no dilution, so only P1 yields a plot spec.
    assert_eq!(summary.plots_built, 1);
    assert_eq!(summary.plots_rendered, 0);

    let export = summary.export.unwrap();
    assert_eq!(export, dir.path().join("Plate 1.txt"));
    let contents = fs::read_to_string(export).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "patient_id\tvisit\tdilution\tHospital\tAge\tGender\tIgG"
    );
    // Both P1 rows carry the anchor's demographics after reconciliation.
    assert_eq!(lines[1], "P1\tV1\t100\tH1\t30\tF\t5");
    assert_eq!(lines[2], "P1\tV2\t1000\tH1\t30\tF\t7");
    // Blocks are positional: the CTRL row follows P1's anchor and inherits it.
    assert_eq!(lines[3], "CTRL\tNA\t\tH1\t30\tF\t1");
    assert!(!contents.contains("NaN"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let summary = process_sheet(&sample_sheet(), &config(dir.path()), true).unwrap();
    assert!(summary.export.is_none());
    assert_eq!(summary.plots_built, 1);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn missing_identifier_column_fails_the_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = SheetTable::new("Plate X", vec!["Hospital".to_string()]);
    let error = process_sheet(&sheet, &config(dir.path()), false).unwrap_err();
    assert!(error.to_string().contains("Sample ID"));
}

#[test]
fn rendering_writes_plot_images() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.render_plots = true;
    config.plot_size = (640, 480);

    let summary = process_sheet(&sample_sheet(), &config, false).unwrap();
    assert_eq!(summary.plots_built, 1);
    assert_eq!(summary.plots_rendered, 1);

    let image = dir.path().join("Plate 1").join("Plate 1-P1-IgG.png");
    let metadata = fs::metadata(image).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn one_failed_sheet_does_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let options = RunOptions {
        workbook: PathBuf::from("workbook.xlsx"),
        config: config(dir.path()),
        dry_run: false,
    };
    let broken = SheetTable::new("Plate X", vec!["Hospital".to_string()]);

    let result = process_sheets(&[broken, sample_sheet()], &options);
    assert!(result.has_errors);
    assert_eq!(result.sheets.len(), 2);

    let failed = &result.sheets[0];
    assert_eq!(failed.sheet, "Plate X");
    assert!(failed.error.as_deref().unwrap().contains("Sample ID"));
    assert!(failed.export.is_none());

    // The second sheet still exported.
    let healthy = &result.sheets[1];
    assert!(healthy.error.is_none());
    assert!(dir.path().join("Plate 1.txt").exists());
}
