// Pass/warn/fail verdict for the newest sample of a timing series

use crate::error::{PerfError, Result};
use crate::regression::config::RegressionConfig;
use crate::regression::series::TimeSeries;
use crate::regression::statistics::BaselineStats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the regression test for one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfStatus {
    /// Newest sample within `k * std` of the mean
    Pass,
    /// Newest sample out of bounds, but the previous one was within bounds
    Warn,
    /// Newest and previous samples both out of bounds
    Fail,
}

impl PerfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerfStatus::Pass => "pass",
            PerfStatus::Warn => "warn",
            PerfStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for PerfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of the newest sample of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub status: PerfStatus,
    /// The newest sample
    pub measured: f64,
    pub mean: f64,
    pub std: f64,
}

/// Classify the newest sample with the default baseline (all samples)
///
/// # Example
/// ```
/// use perfwatch::regression::{classify, PerfStatus, TimeSeries};
///
/// let series = TimeSeries::from(vec![10.0, 10.0, 10.0, 10.0, 15.0]);
/// let result = classify(&series, 2.0).unwrap();
/// assert_eq!(result.status, PerfStatus::Warn);
/// assert_eq!(result.mean, 11.0);
/// assert_eq!(result.std, 2.0);
/// ```
pub fn classify(series: &TimeSeries, threshold_coeff: f64) -> Result<Classification> {
    classify_with(series, &RegressionConfig::with_threshold(threshold_coeff))
}

/// Classify the newest sample of `series` under `config`
///
/// Requires at least two samples. Comparisons are strict, so a flat series
/// (`std == 0`) yields `Fail`.
pub fn classify_with(series: &TimeSeries, config: &RegressionConfig) -> Result<Classification> {
    let samples = series.as_slice();
    let (Some(measured), Some(previous)) = (series.latest(), series.previous()) else {
        return Err(PerfError::InsufficientData {
            samples: samples.len(),
        });
    };

    let baseline_len = samples.len().saturating_sub(config.exclude_last);
    if baseline_len == 0 {
        return Err(PerfError::InsufficientData {
            samples: samples.len(),
        });
    }

    let stats = BaselineStats::from_samples(&samples[..baseline_len])?;
    let bound = config.threshold_coeff * stats.std;

    let status = if stats.deviation(measured) < bound {
        PerfStatus::Pass
    } else if stats.deviation(previous) < bound {
        PerfStatus::Warn
    } else {
        PerfStatus::Fail
    };

    Ok(Classification {
        status,
        measured,
        mean: stats.mean,
        std: stats.std,
    })
}
