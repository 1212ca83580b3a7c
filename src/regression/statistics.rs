// Baseline statistics for regression classification
//
// Two-pass f64 mean and population variance (divide by n). Samples are
// shifted by the first value before summing, so a flat series has a mean
// equal to its samples and a std of exactly zero, and nearby large timings
// keep their spread.

use crate::error::{PerfError, Result};
use serde::Serialize;

/// Mean and population standard deviation of a baseline window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineStats {
    pub mean: f64,
    pub std: f64,
}

impl BaselineStats {
    /// Compute mean and population standard deviation
    ///
    /// # Example
    /// ```
    /// use perfwatch::regression::BaselineStats;
    ///
    /// let stats = BaselineStats::from_samples(&[10.0, 10.0, 10.0, 10.0, 15.0]).unwrap();
    /// assert_eq!(stats.mean, 11.0);
    /// assert_eq!(stats.std, 2.0);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        let Some(&pivot) = samples.first() else {
            return Err(PerfError::InsufficientData { samples: 0 });
        };
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(PerfError::Statistics(
                "non-finite sample in series".to_string(),
            ));
        }

        let n = samples.len() as f64;
        let offset = samples.iter().map(|s| s - pivot).sum::<f64>() / n;
        let mean = pivot + offset;
        let variance = samples
            .iter()
            .map(|s| {
                let d = (s - pivot) - offset;
                d * d
            })
            .sum::<f64>()
            / n;

        Ok(Self {
            mean,
            std: variance.sqrt(),
        })
    }

    /// Distance of `sample` from the mean
    pub fn deviation(&self, sample: f64) -> f64 {
        (sample - self.mean).abs()
    }
}
