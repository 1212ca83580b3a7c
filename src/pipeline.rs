//! Nightly pipeline: archive → classification → aggregation → rendering
//!
//! A missing results file for the run date short-circuits to a fixed
//! failure notice before any classification happens.

use crate::aggregate::{aggregate, aggregate_parallel};
use crate::archive::ResultArchive;
use crate::config::NightlyConfig;
use crate::dispatch::Envelope;
use crate::error::Result;
use crate::html_output::{render, render_data_absence};
use crate::report::Report;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Format a run date as the archive's YYYYMMDD stamp
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Per-invocation settings not carried by the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub date: NaiveDate,
    /// Evaluate cases concurrently
    pub parallel: bool,
}

/// Result of one nightly run
#[derive(Debug, Clone)]
pub struct NightlyRun {
    pub envelope: Envelope,
    /// `None` when the run short-circuited on missing data
    pub report: Option<Report>,
    /// Whether the subject carries the failed tag
    pub failed: bool,
}

/// Run the whole nightly pipeline and build the envelope to dispatch
pub fn run_nightly(
    config: &NightlyConfig,
    archive: &ResultArchive,
    options: &PipelineOptions,
) -> Result<NightlyRun> {
    let stamp = date_stamp(options.date);
    let mut render_options = config.render_options();
    render_options.links = config.links.for_date(options.date);

    if !archive.has_date(&stamp) {
        warn!(date = %stamp, "no results for run date, sending failure notice");
        let rendered = render_data_absence(&render_options);
        return Ok(NightlyRun {
            envelope: Envelope {
                subject: rendered.subject,
                sender: config.mail.sender.clone(),
                recipients: config.mail.failure_recipients().to_vec(),
                body: rendered.body,
            },
            report: None,
            failed: true,
        });
    }

    // Later nights must not leak into this run's verdict
    let archive = archive.as_of(&stamp);
    let cases = config.case_keys();
    let report = if options.parallel {
        aggregate_parallel(&cases, &config.timers, &config.regression, &archive, &archive)?
    } else {
        aggregate(&cases, &config.timers, &config.regression, &archive, &archive)?
    };

    info!("building HTML");
    let rendered = render(&report, &render_options);
    let failed = report.has_failures();
    info!(subject = %rendered.subject, "report ready");

    Ok(NightlyRun {
        envelope: Envelope {
            subject: rendered.subject,
            sender: config.mail.sender.clone(),
            recipients: config.mail.recipients.clone(),
            body: rendered.body,
        },
        report: Some(report),
        failed,
    })
}
