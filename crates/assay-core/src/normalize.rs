//! Table normalization.
//!
//! Classifies the identifier column of every row and rebuilds the table with
//! `patient_id`, `visit`, `dilution` as the leading columns; the original
//! identifier column is dropped. Row order is preserved, which the
//! block-based reconciliation in [`crate::reconcile`] depends on.

use tracing::warn;

use assay_model::{CellValue, SheetTable};

use crate::classify::classify;
use crate::error::CoreError;

/// Leading column names of a normalized table.
pub const PATIENT_ID_COLUMN: &str = "patient_id";
pub const VISIT_COLUMN: &str = "visit";
pub const DILUTION_COLUMN: &str = "dilution";

/// A normalized table plus the rows dropped on the way.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub table: SheetTable,
    /// Rows excluded because their identifier was blank or absent.
    pub skipped_rows: usize,
}

/// Normalize one sheet.
///
/// Rows whose identifier cell is missing or blank are excluded with a
/// warning rather than failing the sheet; the count is reported on the
/// outcome.
///
/// # Errors
///
/// `CoreError::MissingIdentifierColumn` when the sheet has no identifier
/// column at all. Sheet-fatal: without it nothing can be classified.
pub fn normalize(sheet: &SheetTable, identifier_column: &str) -> Result<NormalizeOutcome, CoreError> {
    let identifier_index =
        sheet
            .column_index(identifier_column)
            .ok_or_else(|| CoreError::MissingIdentifierColumn {
                sheet: sheet.name().to_string(),
                column: identifier_column.to_string(),
            })?;

    let mut headers = vec![
        PATIENT_ID_COLUMN.to_string(),
        VISIT_COLUMN.to_string(),
        DILUTION_COLUMN.to_string(),
    ];
    headers.extend(
        sheet
            .columns()
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != identifier_index)
            .map(|(_, column)| column.clone()),
    );

    let mut table = SheetTable::new(sheet.name(), headers);
    let mut skipped_rows = 0usize;
    for (row_number, row) in sheet.rows().iter().enumerate() {
        let identifier = row[identifier_index].export_text();
        let parsed = match classify(&identifier) {
            Ok(parsed) => parsed,
            Err(CoreError::MalformedIdentifier) => {
                warn!(
                    sheet = sheet.name(),
                    row = row_number,
                    "blank sample identifier, row excluded"
                );
                skipped_rows += 1;
                continue;
            }
            Err(error) => return Err(error),
        };

        let mut cells = Vec::with_capacity(row.len() + 2);
        cells.push(CellValue::Text(parsed.patient_id));
        cells.push(CellValue::Text(parsed.visit));
        cells.push(match parsed.dilution {
            Some(dilution) => CellValue::Number(dilution as f64),
            None => CellValue::Missing,
        });
        cells.extend(
            row.iter()
                .enumerate()
                .filter(|(position, _)| *position != identifier_index)
                .map(|(_, cell)| cell.clone()),
        );
        table.push_row(cells);
    }

    Ok(NormalizeOutcome {
        table,
        skipped_rows,
    })
}
