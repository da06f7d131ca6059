//! Row-major sheet tables with a schema built once per sheet.

use std::collections::HashMap;

use thiserror::Error;

use crate::cell::CellValue;

/// Errors from table schema lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A named column is not part of the table schema.
    #[error("column not found: {0}")]
    ColumnNotFound(String),
}

/// Normalize a raw header: trim, strip a BOM, collapse internal whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// One logical table: a sheet name, ordered trimmed column names, and
/// row-major cells. Row order is load order and is preserved by every
/// operation; block-based reconciliation depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    /// Create an empty table. Header names are normalized before the
    /// name-to-index map is built; a duplicated header keeps its first
    /// position.
    pub fn new(name: impl Into<String>, headers: impl IntoIterator<Item = String>) -> Self {
        let columns: Vec<String> = headers.into_iter().map(|h| normalize_header(&h)).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            index.entry(column.clone()).or_insert(position);
        }
        Self {
            name: name.into(),
            columns,
            index,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by (normalized) name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(&normalize_header(column)).copied()
    }

    /// Position of a column, or `TableError::ColumnNotFound`.
    pub fn require_column(&self, column: &str) -> Result<usize, TableError> {
        self.column_index(column)
            .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))
    }

    /// Append a row, padding short rows with `Missing` and dropping cells
    /// past the header width.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        cells.truncate(self.columns.len());
        cells.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(cells);
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<CellValue>] {
        &mut self.rows
    }

    /// Cell at (row, column position).
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        &self.rows[row][column]
    }

    /// Cell by column name, `None` when the column is absent.
    pub fn cell_by_name(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.column_index(column).map(|idx| &self.rows[row][idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalized_before_lookup() {
        let table = SheetTable::new(
            "Plate 1",
            vec!["  Sample ID \n".to_string(), "\u{feff}Hospital".to_string()],
        );
        assert_eq!(table.columns(), ["Sample ID", "Hospital"]);
        assert_eq!(table.column_index("Sample ID"), Some(0));
        assert_eq!(table.column_index(" Hospital "), Some(1));
        assert_eq!(table.column_index("Age"), None);
    }

    #[test]
    fn push_row_pads_and_truncates_to_schema_width() {
        let mut table = SheetTable::new("t", vec!["A".to_string(), "B".to_string()]);
        table.push_row(vec![CellValue::Number(1.0)]);
        table.push_row(vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Number(3.0),
        ]);
        assert_eq!(table.cell(0, 1), &CellValue::Missing);
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn require_column_reports_the_missing_name() {
        let table = SheetTable::new("t", vec!["A".to_string()]);
        assert_eq!(
            table.require_column("Sample ID"),
            Err(TableError::ColumnNotFound("Sample ID".to_string()))
        );
    }
}
