// Chronological timing history for one (case, timer) pair

use serde::{Deserialize, Serialize};

/// Wall-time samples in seconds, oldest first; the last element is the current run
///
/// Order is load-bearing: classification inspects the last two samples.
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries(Vec<f64>);

impl TimeSeries {
    pub fn new(samples: Vec<f64>) -> Self {
        Self(samples)
    }

    /// Append a sample as the newest run
    pub fn push(&mut self, sample: f64) {
        self.0.push(sample);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The current run
    pub fn latest(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// The run before the current one
    pub fn previous(&self) -> Option<f64> {
        self.0.len().checked_sub(2).map(|i| self.0[i])
    }
}

impl From<Vec<f64>> for TimeSeries {
    fn from(samples: Vec<f64>) -> Self {
        Self(samples)
    }
}

impl FromIterator<f64> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
