//! Case aggregation: run outcomes and timer series rolled into a `Report`
//!
//! Each case is isolated: a failed run, an unreachable source, or a missing
//! timer is recorded in that case's result and never aborts sibling cases.

use crate::case::CaseKey;
use crate::error::{PerfError, Result};
use crate::regression::{classify_with, RegressionConfig, TimeSeries};
use crate::report::{CaseResult, Report, TimerRecord};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Supplies whether a case's latest run succeeded
pub trait RunOutcomeSource {
    /// `Ok(true)` if the latest run passed, `Ok(false)` if it failed
    fn run_succeeded(&self, case: &CaseKey) -> Result<bool>;
}

/// Supplies the chronological history of one timer for one case
pub trait SeriesSource {
    /// Timer names are matched verbatim, punctuation included
    fn series(&self, case: &CaseKey, timer: &str) -> Result<TimeSeries>;
}

/// Evaluate every configured case in order, sequentially
///
/// # Example
/// ```
/// use perfwatch::aggregate::{aggregate, RunOutcomeSource, SeriesSource};
/// use perfwatch::case::CaseKey;
/// use perfwatch::regression::{RegressionConfig, TimeSeries};
///
/// struct Fixed;
/// impl RunOutcomeSource for Fixed {
///     fn run_succeeded(&self, _: &CaseKey) -> perfwatch::Result<bool> { Ok(true) }
/// }
/// impl SeriesSource for Fixed {
///     fn series(&self, _: &CaseKey, _: &str) -> perfwatch::Result<TimeSeries> {
///         Ok(TimeSeries::from(vec![10.0, 11.0, 10.5]))
///     }
/// }
///
/// let cases = CaseKey::for_cases(["cube"], 4);
/// let timers = vec!["Total Time:".to_string()];
/// let report = aggregate(&cases, &timers, &RegressionConfig::default(), &Fixed, &Fixed).unwrap();
/// assert_eq!(report.len(), 1);
/// ```
pub fn aggregate<R, S>(
    cases: &[CaseKey],
    timers: &[String],
    config: &RegressionConfig,
    runs: &R,
    series: &S,
) -> Result<Report>
where
    R: RunOutcomeSource + ?Sized,
    S: SeriesSource + ?Sized,
{
    config.validate()?;
    info!(cases = cases.len(), timers = timers.len(), "running performance analysis");

    let results = cases
        .iter()
        .map(|case| evaluate_case(case, timers, config, runs, series))
        .collect();

    Report::new(results)
}

/// Evaluate cases concurrently with rayon; report order stays configuration order
pub fn aggregate_parallel<R, S>(
    cases: &[CaseKey],
    timers: &[String],
    config: &RegressionConfig,
    runs: &R,
    series: &S,
) -> Result<Report>
where
    R: RunOutcomeSource + Sync + ?Sized,
    S: SeriesSource + Sync + ?Sized,
{
    config.validate()?;
    info!(
        cases = cases.len(),
        timers = timers.len(),
        "running performance analysis in parallel"
    );

    // Indexed parallel collect keeps input order
    let results: Vec<CaseResult> = cases
        .par_iter()
        .map(|case| evaluate_case(case, timers, config, runs, series))
        .collect();

    Report::new(results)
}

/// Evaluate a single case; never fails, errors become part of the result
pub fn evaluate_case<R, S>(
    case: &CaseKey,
    timers: &[String],
    config: &RegressionConfig,
    runs: &R,
    series: &S,
) -> CaseResult
where
    R: RunOutcomeSource + ?Sized,
    S: SeriesSource + ?Sized,
{
    match runs.run_succeeded(case) {
        Ok(true) => {}
        Ok(false) => {
            warn!(case = %case, "run failed, skipping timers");
            return CaseResult::did_not_run(case.clone(), None);
        }
        Err(e) => {
            warn!(case = %case, error = %e, "run outcome unavailable");
            return CaseResult::did_not_run(case.clone(), Some(e.to_string()));
        }
    }

    let records = timers
        .iter()
        .map(|timer| evaluate_timer(case, timer, config, series))
        .collect();

    let result = CaseResult::ran(case.clone(), records);
    debug!(case = %case, color = %result.color(), "case evaluated");
    result
}

fn evaluate_timer<S>(
    case: &CaseKey,
    timer: &str,
    config: &RegressionConfig,
    series: &S,
) -> TimerRecord
where
    S: SeriesSource + ?Sized,
{
    let classified = series
        .series(case, timer)
        .and_then(|history| classify_with(&history, config));

    match classified {
        Ok(result) => {
            debug!(case = %case, timer, status = %result.status, "timer classified");
            TimerRecord::measured(timer, result)
        }
        Err(e) => {
            warn!(case = %case, timer, error = %e, "timer could not be classified");
            TimerRecord::error(timer, &e)
        }
    }
}

/// In-memory source, keyed by case and verbatim timer name
///
/// Useful for tests and for callers that already hold the histories.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    outcomes: Vec<(CaseKey, bool)>,
    series: Vec<(CaseKey, String, TimeSeries)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, case: CaseKey, passed: bool) -> Self {
        self.outcomes.push((case, passed));
        self
    }

    pub fn with_series(
        mut self,
        case: CaseKey,
        timer: impl Into<String>,
        samples: Vec<f64>,
    ) -> Self {
        self.series.push((case, timer.into(), TimeSeries::from(samples)));
        self
    }
}

impl RunOutcomeSource for MemorySource {
    fn run_succeeded(&self, case: &CaseKey) -> Result<bool> {
        self.outcomes
            .iter()
            .find(|(k, _)| k == case)
            .map(|(_, passed)| *passed)
            .ok_or_else(|| PerfError::MissingCase {
                case: case.to_string(),
            })
    }
}

impl SeriesSource for MemorySource {
    fn series(&self, case: &CaseKey, timer: &str) -> Result<TimeSeries> {
        self.series
            .iter()
            .find(|(k, t, _)| k == case && t == timer)
            .map(|(_, _, s)| s.clone())
            .ok_or_else(|| PerfError::MissingTimer {
                case: case.to_string(),
                timer: timer.to_string(),
            })
    }
}
