//! CLI argument definitions for the assay-plate pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "assay-plate",
    version,
    about = "Assay plate cleaner - normalize sample identifiers and plot dose-response curves",
    long_about = "Clean multi-sheet assay workbooks.\n\n\
                  Classifies free-text sample identifiers into patient id, visit, and\n\
                  dilution, forward-fills per-patient demographics, exports one\n\
                  tab-separated table per sheet, and renders one log-log dose-response\n\
                  plot per patient per analyte."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process a workbook: export cleaned tables and render plots.
    Run(RunArgs),

    /// List the sheets of a workbook with their dimensions.
    Sheets(SheetsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the assay workbook (xlsx, xls, or ods).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Layout file listing the analyte columns to plot (tab/newline delimited).
    #[arg(long = "layout", value_name = "FILE")]
    pub layout: PathBuf,

    /// Output directory for exports and plots (default: <WORKBOOK dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name of the sample identifier column.
    #[arg(long = "identifier-column", default_value = "Sample ID")]
    pub identifier_column: String,

    /// Zero-based header row index within each sheet. The default skips the
    /// plate banner row the source workbooks carry.
    #[arg(long = "header-row", default_value_t = 1)]
    pub header_row: usize,

    /// Export cleaned tables but skip plot rendering.
    #[arg(long = "no-plots")]
    pub no_plots: bool,

    /// Process and report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// Path to the assay workbook.
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
