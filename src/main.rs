use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use perfwatch::archive::ResultArchive;
use perfwatch::cli::Cli;
use perfwatch::config::NightlyConfig;
use perfwatch::dispatch::{Dispatcher, WriterDispatcher};
use perfwatch::json_output::JsonReport;
use perfwatch::pipeline::{self, PipelineOptions};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; logs go to stderr so stdout stays clean
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn parse_run_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text, "%Y%m%d")
            .with_context(|| format!("Invalid --date '{}', expected YYYYMMDD", text)),
        None => Ok(Local::now().date_naive()),
    }
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let mut config = NightlyConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(threshold) = args.threshold {
        config.regression.threshold_coeff = threshold;
        config.validate().context("Invalid --threshold")?;
    }

    let options = PipelineOptions {
        date: parse_run_date(args.date.as_deref())?,
        parallel: args.parallel,
    };

    let archive = ResultArchive::load_dir(&args.data_dir)
        .with_context(|| format!("Failed to read results from {}", args.data_dir.display()))?;

    let run = pipeline::run_nightly(&config, &archive, &options)?;

    if let (Some(path), Some(report)) = (&args.report_json, &run.report) {
        let json = JsonReport::new(report, &config.regression, pipeline::date_stamp(options.date))
            .to_json()?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            WriterDispatcher::new(BufWriter::new(file), args.format).dispatch(&run.envelope)?;
        }
        None => {
            WriterDispatcher::new(io::stdout().lock(), args.format).dispatch(&run.envelope)?;
        }
    }

    if args.strict && run.failed {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
