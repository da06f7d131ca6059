//! Workbook loading via calamine.
//!
//! Each sheet becomes one [`SheetTable`]. The source workbooks carry a plate
//! banner on the first physical row, so the header row index is configurable
//! and defaults to 1 in [`assay_model::PipelineConfig`]. Blank cells and the
//! literal string "NaN" ingest as [`CellValue::Missing`].

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, warn};

use assay_model::{CellValue, SheetTable};

use crate::error::IngestError;

/// Read every sheet of an xlsx/xls/ods workbook.
///
/// Sheets that cannot be read are skipped with a warning so one broken sheet
/// does not abort a multi-sheet run; sheets with too few rows to contain the
/// header are skipped the same way.
pub fn read_workbook(path: &Path, header_row: usize) -> Result<Vec<SheetTable>, IngestError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tables = Vec::new();
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(source) => {
                warn!(sheet = %name, error = %source, "skipping unreadable sheet");
                continue;
            }
        };
        match sheet_from_range(&name, range.rows(), header_row) {
            Ok(table) => {
                debug!(
                    sheet = %name,
                    rows = table.row_count(),
                    columns = table.column_count(),
                    "sheet loaded"
                );
                tables.push(table);
            }
            Err(error) => warn!(sheet = %name, error = %error, "skipping sheet"),
        }
    }
    Ok(tables)
}

/// List the sheet names and dimensions of a workbook without converting it.
///
/// Unreadable sheets are skipped with a warning, the same policy as
/// [`read_workbook`].
pub fn probe_workbook(path: &Path) -> Result<Vec<(String, usize, usize)>, IngestError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let names = workbook.sheet_names();
    Ok(probe_sheets(names.into_iter().map(|name| {
        let size = workbook
            .worksheet_range(&name)
            .map(|range| range.get_size());
        (name, size)
    })))
}

fn probe_sheets<E: std::fmt::Display>(
    sizes: impl Iterator<Item = (String, Result<(usize, usize), E>)>,
) -> Vec<(String, usize, usize)> {
    let mut sheets = Vec::new();
    for (name, size) in sizes {
        match size {
            Ok((rows, columns)) => sheets.push((name, rows, columns)),
            Err(source) => {
                warn!(sheet = %name, error = %source, "skipping unreadable sheet");
            }
        }
    }
    sheets
}

fn sheet_from_range<'a>(
    name: &str,
    mut rows: impl Iterator<Item = &'a [Data]>,
    header_row: usize,
) -> Result<SheetTable, IngestError> {
    let headers = rows
        .nth(header_row)
        .ok_or_else(|| IngestError::MissingHeaderRow {
            name: name.to_string(),
            header_row,
        })?;
    let mut table = SheetTable::new(name, headers.iter().map(header_text));
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        // Trailing blank rows are common in hand-edited workbooks.
        if cells.iter().all(CellValue::is_missing) {
            continue;
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map one calamine cell to the tagged cell model. The source files mark
/// missing measurements with the literal string "NaN".
fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                CellValue::Missing
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(v) => {
            if v.is_nan() {
                CellValue::Missing
            } else {
                CellValue::Number(*v)
            }
        }
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Text(v.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_row(cells: &[Data]) -> Vec<Data> {
        cells.to_vec()
    }

    #[test]
    fn header_row_offset_skips_the_banner() {
        let rows = vec![
            data_row(&[Data::String("Plate 1 raw data".into()), Data::Empty]),
            data_row(&[
                Data::String(" Sample ID ".into()),
                Data::String("IgG".into()),
            ]),
            data_row(&[Data::String("P1 V1 100".into()), Data::Float(5.0)]),
        ];
        let table = sheet_from_range("Plate 1", rows.iter().map(Vec::as_slice), 1).unwrap();
        assert_eq!(table.columns(), ["Sample ID", "IgG"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, 1), &CellValue::Number(5.0));
    }

    #[test]
    fn nan_strings_and_blanks_ingest_as_missing() {
        assert_eq!(convert_cell(&Data::String("NaN".into())), CellValue::Missing);
        assert_eq!(convert_cell(&Data::String("  ".into())), CellValue::Missing);
        assert_eq!(convert_cell(&Data::Float(f64::NAN)), CellValue::Missing);
        assert_eq!(convert_cell(&Data::Empty), CellValue::Missing);
        assert_eq!(
            convert_cell(&Data::String(" H1 ".into())),
            CellValue::Text("H1".to_string())
        );
    }

    #[test]
    fn all_blank_rows_are_dropped() {
        let rows = vec![
            data_row(&[Data::String("Sample ID".into()), Data::String("IgG".into())]),
            data_row(&[Data::Empty, Data::Empty]),
            data_row(&[Data::String("P1".into()), Data::Int(3)]),
        ];
        let table = sheet_from_range("t", rows.iter().map(Vec::as_slice), 0).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn probe_skips_unreadable_sheets() {
        let sizes = vec![
            ("Plate 1".to_string(), Ok((10, 4))),
            ("Plate 2".to_string(), Err("worksheet is corrupt")),
            ("Plate 3".to_string(), Ok((2, 1))),
        ];
        let sheets = probe_sheets(sizes.into_iter());
        assert_eq!(
            sheets,
            [
                ("Plate 1".to_string(), 10, 4),
                ("Plate 3".to_string(), 2, 1),
            ]
        );
    }

    #[test]
    fn missing_header_row_is_reported() {
        let rows: Vec<Vec<Data>> = vec![data_row(&[Data::String("banner".into())])];
        let error = sheet_from_range("t", rows.iter().map(Vec::as_slice), 1).unwrap_err();
        assert!(matches!(error, IngestError::MissingHeaderRow { .. }));
    }
}
