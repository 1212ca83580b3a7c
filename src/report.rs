//! Typed nightly report: per-timer results rolled up per case
//!
//! Invariants are enforced at construction: a case that did not run holds no
//! timer records, report keys are unique, and report order is configuration
//! order.

use crate::case::CaseKey;
use crate::error::{PerfError, Result};
use crate::regression::{Classification, PerfStatus};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Traffic-light color used in the rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Red => "red",
        }
    }
}

impl From<PerfStatus> for StatusColor {
    fn from(status: PerfStatus) -> Self {
        match status {
            PerfStatus::Pass => StatusColor::Green,
            PerfStatus::Warn => StatusColor::Yellow,
            PerfStatus::Fail => StatusColor::Red,
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified newest sample of one timer
pub type TimerResult = Classification;

/// Error recorded in place of a timer result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerError {
    /// Short tag, e.g. `missing_timer`
    pub kind: String,
    pub message: String,
}

impl From<&PerfError> for TimerError {
    fn from(err: &PerfError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result or error for one configured timer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum TimerOutcome {
    Measured(TimerResult),
    Error(TimerError),
}

/// One configured timer of a case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerRecord {
    /// Timer name exactly as configured
    pub name: String,
    #[serde(flatten)]
    pub outcome: TimerOutcome,
}

impl TimerRecord {
    pub fn measured(name: impl Into<String>, result: TimerResult) -> Self {
        Self {
            name: name.into(),
            outcome: TimerOutcome::Measured(result),
        }
    }

    pub fn error(name: impl Into<String>, err: &PerfError) -> Self {
        Self {
            name: name.into(),
            outcome: TimerOutcome::Error(err.into()),
        }
    }

    /// Errored timers count as failures
    pub fn status(&self) -> PerfStatus {
        match &self.outcome {
            TimerOutcome::Measured(result) => result.status,
            TimerOutcome::Error(_) => PerfStatus::Fail,
        }
    }

    pub fn color(&self) -> StatusColor {
        self.status().into()
    }
}

/// Pass/warn/fail occurrence counts among a case's timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

impl StatusTally {
    pub fn record(&mut self, status: PerfStatus) {
        match status {
            PerfStatus::Pass => self.pass += 1,
            PerfStatus::Warn => self.warn += 1,
            PerfStatus::Fail => self.fail += 1,
        }
    }

    /// Red if any fail, else yellow if any warn, else green
    pub fn color(&self) -> StatusColor {
        if self.fail > 0 {
            StatusColor::Red
        } else if self.warn > 0 {
            StatusColor::Yellow
        } else {
            StatusColor::Green
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.warn + self.fail
    }
}

impl fmt::Display for StatusTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.pass, self.warn, self.fail)
    }
}

/// Whether a case's run happened, and what its timers showed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "run", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The underlying run failed or could not be queried
    DidNotRun { reason: Option<String> },
    Ran {
        timers: Vec<TimerRecord>,
        tally: StatusTally,
    },
}

/// Rolled-up result for one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub key: CaseKey,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
}

impl CaseResult {
    /// A case whose run failed; carries no timer records
    pub fn did_not_run(key: CaseKey, reason: Option<String>) -> Self {
        Self {
            key,
            outcome: CaseOutcome::DidNotRun { reason },
        }
    }

    /// A case that ran; the tally is derived from the records
    pub fn ran(key: CaseKey, timers: Vec<TimerRecord>) -> Self {
        let mut tally = StatusTally::default();
        for timer in &timers {
            tally.record(timer.status());
        }
        Self {
            key,
            outcome: CaseOutcome::Ran { timers, tally },
        }
    }

    pub fn did_run(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Ran { .. })
    }

    /// Timer records in configured order (empty if the case did not run)
    pub fn timers(&self) -> &[TimerRecord] {
        match &self.outcome {
            CaseOutcome::Ran { timers, .. } => timers,
            CaseOutcome::DidNotRun { .. } => &[],
        }
    }

    pub fn tally(&self) -> Option<StatusTally> {
        match &self.outcome {
            CaseOutcome::Ran { tally, .. } => Some(*tally),
            CaseOutcome::DidNotRun { .. } => None,
        }
    }

    /// Aggregate color: red when the run failed, otherwise the tally color
    pub fn color(&self) -> StatusColor {
        match &self.outcome {
            CaseOutcome::Ran { tally, .. } => tally.color(),
            CaseOutcome::DidNotRun { .. } => StatusColor::Red,
        }
    }
}

/// Ordered collection of case results, in configured order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    cases: Vec<CaseResult>,
}

impl Report {
    /// Build a report, rejecting duplicate case keys
    pub fn new(cases: Vec<CaseResult>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(cases.len());
        for case in &cases {
            if !seen.insert(&case.key) {
                return Err(PerfError::DuplicateCase {
                    case: case.key.to_string(),
                });
            }
        }
        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[CaseResult] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, key: &CaseKey) -> Option<&CaseResult> {
        self.cases.iter().find(|c| &c.key == key)
    }

    /// True if any case color or any timer color anywhere is red
    ///
    /// Both levels are scanned: the summary color and the detail rows.
    pub fn has_failures(&self) -> bool {
        self.cases.iter().any(|case| {
            case.color() == StatusColor::Red
                || case.timers().iter().any(|t| t.color() == StatusColor::Red)
        })
    }
}
