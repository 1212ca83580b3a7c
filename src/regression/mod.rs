// Nightly regression classification for timed benchmark cases
//
// Decides pass/warn/fail for the newest sample of a timer's history using a
// single-threshold z-like test:
//
//   pass  if |x[n-1] - mean| < k * std
//   warn  else if |x[n-2] - mean| < k * std   (isolated spike)
//   fail  otherwise
//
// mean and std are population statistics over the whole series, newest
// sample included. The comparison is strict, so a perfectly flat history
// (std == 0) classifies as fail.
//
// Implementation:
// - Statistics are computed in f64 so close nightly timings keep their spread
// - `RegressionConfig::exclude_last` can shrink the baseline window

mod config;
mod series;
mod statistics;
mod verdict;

pub use config::RegressionConfig;
pub use series::TimeSeries;
pub use statistics::BaselineStats;
pub use verdict::{classify, classify_with, Classification, PerfStatus};
