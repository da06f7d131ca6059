//! Tab-separated sheet exports.
//!
//! One `<sheet>.txt` per sheet under the output root, column order exactly
//! as the reconciled table. Missing and empty cells both render as empty
//! fields; the export contract is that the literal string "NaN" never
//! appears in a cell.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use assay_model::SheetTable;

use crate::error::ReportError;

/// Write one sheet's export, returning the path written.
pub fn write_sheet_export(table: &SheetTable, output_root: &Path) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_root).map_err(|source| ReportError::CreateDir {
        path: output_root.to_path_buf(),
        source,
    })?;
    let path = output_root.join(format!("{}.txt", table.name()));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .map_err(|source| export_error(&path, source))?;
    writer
        .write_record(table.columns())
        .map_err(|source| export_error(&path, source))?;
    for row in table.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.export_text()).collect();
        writer
            .write_record(&record)
            .map_err(|source| export_error(&path, source))?;
    }
    writer
        .flush()
        .map_err(|source| export_error(&path, source.into()))?;

    info!(path = %path.display(), rows = table.row_count(), "sheet exported");
    Ok(path)
}

fn export_error(path: &Path, source: csv::Error) -> ReportError {
    ReportError::Export {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use assay_model::CellValue;

    use super::*;

    #[test]
    fn export_is_tab_separated_with_empty_cells_for_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = SheetTable::new(
            "Plate 1",
            vec![
                "patient_id".to_string(),
                "visit".to_string(),
                "dilution".to_string(),
                "IgG".to_string(),
            ],
        );
        table.push_row(vec![
            CellValue::Text("P1".to_string()),
            CellValue::Text("V1".to_string()),
            CellValue::Number(100.0),
            CellValue::Number(5.5),
        ]);
        table.push_row(vec![
            CellValue::Text("P1".to_string()),
            CellValue::Text("NA".to_string()),
            CellValue::Missing,
            CellValue::Empty,
        ]);

        let path = write_sheet_export(&table, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Plate 1.txt"));
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "patient_id\tvisit\tdilution\tIgG");
        assert_eq!(lines[1], "P1\tV1\t100\t5.5");
        assert_eq!(lines[2], "P1\tNA\t\t");
        assert!(!contents.contains("NaN"));
    }

    #[test]
    fn output_root_is_created_if_absent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("run");
        let table = SheetTable::new("s", vec!["patient_id".to_string()]);
        let path = write_sheet_export(&table, &nested).unwrap();
        assert!(path.exists());
        // Idempotent when the directory already exists.
        write_sheet_export(&table, &nested).unwrap();
    }
}
