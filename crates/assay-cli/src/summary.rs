use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ColumnConstraint, Table, Width};

use assay_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Workbook: {}", result.workbook.display());
    println!("Output: {}", result.output_root.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Skipped"),
        header_cell("Patients"),
        header_cell("Plots"),
        header_cell("Export"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for column in 1..=4 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    align_column(&mut table, 6, CellAlignment::Center);

    let mut total_rows = 0usize;
    let mut total_plots = 0usize;
    for sheet in &result.sheets {
        total_rows += sheet.rows;
        total_plots += sheet.plots_rendered;
        table.add_row(vec![
            Cell::new(&sheet.sheet).add_attribute(Attribute::Bold),
            Cell::new(sheet.rows),
            skipped_cell(sheet.skipped_rows),
            Cell::new(sheet.patients),
            Cell::new(format!("{}/{}", sheet.plots_rendered, sheet.plots_built)),
            match &sheet.export {
                Some(path) => Cell::new(path.display()),
                None => dim_cell("-"),
            },
            status_cell(sheet.error.as_deref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_plots).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    let failures: Vec<_> = result
        .sheets
        .iter()
        .filter_map(|sheet| sheet.error.as_ref().map(|error| (&sheet.sheet, error)))
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for (sheet, error) in failures {
            eprintln!("- {sheet}: {error}");
        }
    }
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS);
    if let Some(column) = table.column_mut(0) {
        column.set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(10)));
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn skipped_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        Cell::new(count)
    }
}

fn status_cell(error: Option<&str>) -> Cell {
    match error {
        Some(_) => Cell::new("error").fg(Color::Red).add_attribute(Attribute::Bold),
        None => Cell::new("ok").fg(Color::Green),
    }
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}
