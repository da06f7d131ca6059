//! Demographic reconciliation.
//!
//! Demographics are only recorded on the first row of each patient's block.
//! A row with a non-missing anchor value (hospital) starts a new block; every
//! following row up to the next anchor copies the anchor's demographic
//! values. The fold threads the last seen anchor values across an ordered
//! traversal, so input rows must already be ordered with anchors before
//! their dependents; reconciliation never re-sorts.

use tracing::{debug, warn};

use assay_model::{CellValue, DemographicColumns, SheetTable};

/// What reconciliation did to one sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// False when the anchor column is absent and the table was untouched.
    pub applied: bool,
    /// Number of anchor rows found.
    pub anchors: usize,
    /// Rows before the first anchor; their demographics are set to `Empty`.
    pub rows_before_first_anchor: usize,
}

/// Reconcile demographic columns in place.
///
/// A no-op when the anchor column is absent (checked before any fill).
/// Dependent columns named in the configuration but absent from the sheet
/// are skipped. After reconciliation every row of a block carries identical
/// demographic values, and no demographic cell is left `Missing`: anchor
/// rows with unknown dependents and rows before the first anchor hold the
/// explicit `Empty` value instead.
pub fn reconcile(table: &mut SheetTable, demographics: &DemographicColumns) -> ReconcileOutcome {
    let Some(anchor_index) = table.column_index(&demographics.anchor) else {
        debug!(
            sheet = table.name(),
            anchor = %demographics.anchor,
            "anchor column absent, reconciliation skipped"
        );
        return ReconcileOutcome::default();
    };

    let mut column_indices = vec![anchor_index];
    column_indices.extend(
        demographics
            .dependents
            .iter()
            .filter_map(|column| table.column_index(column)),
    );

    let sheet_name = table.name().to_string();
    let mut outcome = ReconcileOutcome {
        applied: true,
        ..ReconcileOutcome::default()
    };
    let mut carried: Option<Vec<CellValue>> = None;

    for row in table.rows_mut() {
        if row[anchor_index].has_value() {
            // Anchor row: record "present but unknown" dependents explicitly
            // so they propagate as empty rather than as gaps.
            outcome.anchors += 1;
            for &index in &column_indices {
                if row[index].is_missing() {
                    row[index] = CellValue::Empty;
                }
            }
            carried = Some(
                column_indices
                    .iter()
                    .map(|&index| row[index].clone())
                    .collect(),
            );
        } else if let Some(values) = &carried {
            for (&index, value) in column_indices.iter().zip(values) {
                row[index] = value.clone();
            }
        } else {
            // No block to inherit from yet.
            outcome.rows_before_first_anchor += 1;
            for &index in &column_indices {
                row[index] = CellValue::Empty;
            }
        }
    }

    if outcome.rows_before_first_anchor > 0 {
        warn!(
            sheet = %sheet_name,
            rows = outcome.rows_before_first_anchor,
            "rows precede the first anchor; their demographics are exported empty"
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demographics() -> DemographicColumns {
        DemographicColumns::default()
    }

    fn table(rows: Vec<Vec<CellValue>>) -> SheetTable {
        let mut table = SheetTable::new(
            "Plate 1",
            vec![
                "patient_id".to_string(),
                "Hospital".to_string(),
                "Age".to_string(),
                "Gender".to_string(),
            ],
        );
        for row in rows {
            table.push_row(row);
        }
        table
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn blocks_inherit_all_values_from_their_anchor() {
        let mut t = table(vec![
            vec![text("P1"), text("H1"), CellValue::Number(30.0), text("F")],
            vec![text("P1"), CellValue::Missing, CellValue::Missing, CellValue::Missing],
            vec![text("P2"), text("H2"), CellValue::Missing, text("M")],
            vec![text("P2"), CellValue::Missing, CellValue::Missing, CellValue::Missing],
        ]);
        let outcome = reconcile(&mut t, &demographics());
        assert!(outcome.applied);
        assert_eq!(outcome.anchors, 2);
        assert_eq!(outcome.rows_before_first_anchor, 0);

        // Block 1: identical to its anchor.
        assert_eq!(t.cell(1, 1), &text("H1"));
        assert_eq!(t.cell(1, 2), &CellValue::Number(30.0));
        assert_eq!(t.cell(1, 3), &text("F"));
        // Block 2: the anchor's unknown age propagates as explicit Empty.
        assert_eq!(t.cell(2, 2), &CellValue::Empty);
        assert_eq!(t.cell(3, 1), &text("H2"));
        assert_eq!(t.cell(3, 2), &CellValue::Empty);
        assert_eq!(t.cell(3, 3), &text("M"));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut t = table(vec![
            vec![text("P1"), text("H1"), CellValue::Missing, text("F")],
            vec![text("P1"), CellValue::Missing, CellValue::Missing, CellValue::Missing],
        ]);
        reconcile(&mut t, &demographics());
        let once = t.clone();
        reconcile(&mut t, &demographics());
        assert_eq!(t, once);
    }

    #[test]
    fn rows_before_the_first_anchor_get_empty_demographics() {
        let mut t = table(vec![
            vec![text("CTRL"), CellValue::Missing, CellValue::Missing, CellValue::Missing],
            vec![text("P1"), text("H1"), CellValue::Number(30.0), text("F")],
        ]);
        let outcome = reconcile(&mut t, &demographics());
        assert_eq!(outcome.rows_before_first_anchor, 1);
        assert_eq!(t.cell(0, 1), &CellValue::Empty);
        assert_eq!(t.cell(0, 2), &CellValue::Empty);
        assert_eq!(t.cell(0, 3), &CellValue::Empty);
    }

    #[test]
    fn no_op_without_the_anchor_column() {
        let mut t = SheetTable::new(
            "t",
            vec!["patient_id".to_string(), "Age".to_string()],
        );
        t.push_row(vec![text("P1"), CellValue::Missing]);
        let before = t.clone();
        let outcome = reconcile(&mut t, &demographics());
        assert!(!outcome.applied);
        assert_eq!(t, before);
    }

    #[test]
    fn present_values_on_non_anchor_rows_are_overwritten() {
        // The block-identity invariant is unconditional: propagation copies,
        // it does not fill-if-missing.
        let mut t = table(vec![
            vec![text("P1"), text("H1"), CellValue::Number(30.0), text("F")],
            vec![text("P1"), CellValue::Missing, CellValue::Number(99.0), CellValue::Missing],
        ]);
        reconcile(&mut t, &demographics());
        assert_eq!(t.cell(1, 2), &CellValue::Number(30.0));
    }
}
