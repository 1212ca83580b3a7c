//! CLI argument parsing for perfwatch

use crate::dispatch::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "perfwatch")]
#[command(version)]
#[command(
    about = "Classify nightly benchmark timings and build a status report",
    long_about = None
)]
pub struct Cli {
    /// Directory holding ctest-YYYYMMDD*.json result files
    #[arg(value_name = "DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = "perfwatch.toml")]
    pub config: PathBuf,

    /// Run date as YYYYMMDD (default: today, local time)
    #[arg(long, value_name = "YYYYMMDD")]
    pub date: Option<String>,

    /// Override the regression threshold in standard deviations
    #[arg(long, value_name = "SIGMA")]
    pub threshold: Option<f64>,

    /// Output format of the report envelope
    #[arg(long = "format", value_enum, default_value = "mail")]
    pub format: OutputFormat,

    /// Write the envelope to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Also write the structured report as JSON
    #[arg(long = "report-json", value_name = "FILE")]
    pub report_json: Option<PathBuf>,

    /// Evaluate cases in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Exit with status 2 when the report is tagged failed
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
