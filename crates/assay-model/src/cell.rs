//! Tagged cell values.
//!
//! Every cell in a sheet is one of four states. `Missing` means the source
//! had nothing at that position ("not yet reached" during reconciliation);
//! `Empty` means "present but unknown" and is written by the reconciler so
//! that exports can distinguish the two. Both render as an empty string.

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A textual value (already whitespace-trimmed on ingest).
    Text(String),
    /// A numeric value.
    Number(f64),
    /// Present but explicitly unknown; produced by reconciliation.
    Empty,
    /// Nothing in the source at this position.
    Missing,
}

impl CellValue {
    /// Build a text cell from a raw string, mapping blank input to `Missing`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// True when the source had nothing at this position.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// True for `Text` and `Number` cells.
    pub fn has_value(&self) -> bool {
        matches!(self, CellValue::Text(_) | CellValue::Number(_))
    }

    /// Numeric view of the cell. Textual cells are parsed; `Empty` and
    /// `Missing` yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty | CellValue::Missing => None,
        }
    }

    /// Textual view of the cell, `None` when it holds no value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The string written to exports. `Empty` and `Missing` both render as
    /// the empty string; the literal "NaN" must never appear.
    pub fn export_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(v) => format_numeric(*v),
            CellValue::Empty | CellValue::Missing => String::new(),
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_ingests_as_missing() {
        assert_eq!(CellValue::from_text("   "), CellValue::Missing);
        assert_eq!(
            CellValue::from_text(" H1 "),
            CellValue::Text("H1".to_string())
        );
    }

    #[test]
    fn export_text_never_says_nan() {
        assert_eq!(CellValue::Missing.export_text(), "");
        assert_eq!(CellValue::Empty.export_text(), "");
        assert_eq!(CellValue::Number(f64::from(10)).export_text(), "10");
    }

    #[test]
    fn numeric_formatting_strips_trailing_zeros() {
        assert_eq!(format_numeric(5.0), "5");
        assert_eq!(format_numeric(500.0), "500");
        assert_eq!(format_numeric(0.25), "0.25");
        assert_eq!(format_numeric(1.50), "1.5");
    }

    #[test]
    fn as_f64_parses_text() {
        assert_eq!(CellValue::Text("30".to_string()).as_f64(), Some(30.0));
        assert_eq!(CellValue::Text("abc".to_string()).as_f64(), None);
        assert_eq!(CellValue::Empty.as_f64(), None);
    }
}
