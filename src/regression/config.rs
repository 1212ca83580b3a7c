// Configuration for nightly regression classification

use crate::error::{PerfError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the single-threshold regression test
///
/// # Example
/// ```
/// use perfwatch::regression::RegressionConfig;
///
/// let config = RegressionConfig::default();
/// assert_eq!(config.threshold_coeff, 2.0);
/// assert_eq!(config.exclude_last, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Number of standard deviations a sample may sit from the mean
    ///
    /// Default: 2.0
    pub threshold_coeff: f64,

    /// Number of newest samples left out of the mean/std baseline
    ///
    /// - 0 (default): the newest sample is part of its own baseline, which
    ///   damps sensitivity to the very spike being tested
    /// - 1: baseline is every sample except the current run
    ///
    /// The pass/warn decision always tests the last and second-to-last
    /// samples, regardless of this setting.
    pub exclude_last: usize,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            threshold_coeff: 2.0,
            exclude_last: 0,
        }
    }
}

impl RegressionConfig {
    /// Create a configuration with a custom threshold and the default baseline
    pub fn with_threshold(threshold_coeff: f64) -> Self {
        Self {
            threshold_coeff,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_coeff.is_finite() || self.threshold_coeff <= 0.0 {
            return Err(PerfError::InvalidConfig(format!(
                "threshold_coeff must be a positive number, got {}",
                self.threshold_coeff
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegressionConfig::default();
        assert_eq!(config.threshold_coeff, 2.0);
        assert_eq!(config.exclude_last, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_threshold() {
        let config = RegressionConfig::with_threshold(3.0);
        assert_eq!(config.threshold_coeff, 3.0);
        assert_eq!(config.exclude_last, 0);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(RegressionConfig::with_threshold(0.0).validate().is_err());
        assert!(RegressionConfig::with_threshold(-1.0).validate().is_err());
        assert!(RegressionConfig::with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RegressionConfig = toml::from_str("exclude_last = 1").unwrap();
        assert_eq!(config.threshold_coeff, 2.0);
        assert_eq!(config.exclude_last, 1);
    }
}
