use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::warn;

use assay_cli::pipeline::{RunOptions, run};
use assay_cli::types::RunResult;
use assay_ingest::{load_layout, probe_workbook};
use assay_model::PipelineConfig;

use crate::cli::{RunArgs, SheetsArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_workbook(args: &RunArgs) -> Result<RunResult> {
    let analytes = load_layout(&args.layout).context("load layout")?;
    if analytes.is_empty() {
        warn!(
            layout = %args.layout.display(),
            "layout lists no analytes; only table exports will be produced"
        );
    }

    let output_root = args.output_dir.clone().unwrap_or_else(|| {
        args.workbook
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("output")
    });

    let config = PipelineConfig {
        identifier_column: args.identifier_column.clone(),
        analytes,
        output_root,
        header_row: args.header_row,
        render_plots: !args.no_plots,
        ..PipelineConfig::default()
    };

    run(&RunOptions {
        workbook: args.workbook.clone(),
        config,
        dry_run: args.dry_run,
    })
}

pub fn run_sheets(args: &SheetsArgs) -> Result<()> {
    let sheets = probe_workbook(&args.workbook).context("probe workbook")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for (name, rows, columns) in sheets {
        table.add_row(vec![name, rows.to_string(), columns.to_string()]);
    }
    println!("{table}");
    Ok(())
}
