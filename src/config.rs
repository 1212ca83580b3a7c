//! Nightly run configuration (perfwatch.toml)
//!
//! # Example perfwatch.toml
//!
//! ```toml
//! title = "Land Ice Performance Tests"
//! tag_prefix = "ALIPerfTests"
//! nps = 384
//! cases = ["ant-2-20km_ml_line", "ant-2-20km_muelu_line"]
//! # Matched verbatim against the archive, punctuation included
//! timers = ["Albany: Total Time:", "NOX Total Linear Solve:"]
//!
//! [regression]
//! threshold_coeff = 2.0
//! exclude_last = 0
//!
//! [mail]
//! sender = "perf-bot@example.org"
//! recipients = ["dev-a@example.org", "dev-b@example.org"]
//! failure_recipients = ["dev-a@example.org"]
//!
//! [links]
//! logs = "https://cdash.example.org/index.php?project=Albany"
//! archive = "https://example.github.io/perf/Perf_{date}.html"
//! ```

use crate::case::CaseKey;
use crate::error::{PerfError, Result};
use crate::html_output::{RenderOptions, ReportLinks};
use crate::regression::RegressionConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Sender and recipients handed to the dispatcher
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MailConfig {
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Recipients of the no-data failure notice; defaults to `recipients`
    #[serde(default)]
    pub failure_recipients: Option<Vec<String>>,
}

impl MailConfig {
    pub fn failure_recipients(&self) -> &[String] {
        self.failure_recipients.as_deref().unwrap_or(&self.recipients)
    }
}

fn default_title() -> String {
    RenderOptions::default().title
}

fn default_tag_prefix() -> String {
    RenderOptions::default().tag_prefix
}

/// Root configuration for a nightly run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NightlyConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// Process count shared by every case
    pub nps: u32,
    /// Case names, in report order
    pub cases: Vec<String>,
    /// Timer names, in report order
    pub timers: Vec<String>,
    #[serde(default)]
    pub regression: RegressionConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub links: ReportLinks,
}

impl NightlyConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: NightlyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.regression.validate()?;

        if self.timers.is_empty() {
            return Err(PerfError::InvalidConfig(
                "at least one timer must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.cases.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(PerfError::InvalidConfig(format!("duplicate case: {}", dup)));
        }

        if self.mail.sender.trim().is_empty() {
            return Err(PerfError::InvalidConfig(
                "mail.sender must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Case keys in configured order
    pub fn case_keys(&self) -> Vec<CaseKey> {
        CaseKey::for_cases(self.cases.iter().cloned(), self.nps)
    }

    /// Rendering options with links left unexpanded
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: self.title.clone(),
            tag_prefix: self.tag_prefix.clone(),
            links: self.links.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
nps = 4
cases = ["cube", "slab"]
timers = ["Total Time:"]

[mail]
sender = "bot@example.org"
recipients = ["a@example.org"]
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = NightlyConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.title, "Performance Tests");
        assert_eq!(config.tag_prefix, "PerfTests");
        assert_eq!(config.regression, RegressionConfig::default());
        assert_eq!(config.links, ReportLinks::default());
        assert_eq!(config.mail.failure_recipients(), &["a@example.org".to_string()]);
    }

    #[test]
    fn test_case_keys_keep_order() {
        let config = NightlyConfig::from_toml_str(MINIMAL).unwrap();
        let keys: Vec<_> = config.case_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["cube_np4", "slab_np4"]);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
title = "Land Ice Performance Tests"
tag_prefix = "ALIPerfTests"
nps = 384
cases = ["ant-2-20km_ml_line"]
timers = ["Albany: Total Time:", "Albany: **Total Fill Time**:"]

[regression]
threshold_coeff = 2.5
exclude_last = 1

[mail]
sender = "bot@example.org"
recipients = ["a@example.org", "b@example.org"]
failure_recipients = ["a@example.org"]

[links]
logs = "https://logs.example.org"
archive = "https://example.org/Perf_{date}.html"
"#;
        let config = NightlyConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.timers[1], "Albany: **Total Fill Time**:");
        assert_eq!(config.regression.threshold_coeff, 2.5);
        assert_eq!(config.regression.exclude_last, 1);
        assert_eq!(config.mail.failure_recipients().len(), 1);
        assert_eq!(config.render_options().tag_prefix, "ALIPerfTests");
        assert!(config.links.notebook.is_none());
    }

    #[test]
    fn test_rejects_empty_timers() {
        let toml = MINIMAL.replace(r#"timers = ["Total Time:"]"#, "timers = []");
        assert!(matches!(
            NightlyConfig::from_toml_str(&toml),
            Err(PerfError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_cases() {
        let toml = MINIMAL.replace(r#"["cube", "slab"]"#, r#"["cube", "cube"]"#);
        assert!(matches!(
            NightlyConfig::from_toml_str(&toml),
            Err(PerfError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let toml = format!("{}\n[regression]\nthreshold_coeff = -1.0\n", MINIMAL);
        assert!(matches!(
            NightlyConfig::from_toml_str(&toml),
            Err(PerfError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            NightlyConfig::from_toml_str("nps = "),
            Err(PerfError::Toml(_))
        ));
    }

    #[test]
    fn test_empty_case_list_is_allowed() {
        let toml = MINIMAL.replace(r#"["cube", "slab"]"#, "[]");
        let config = NightlyConfig::from_toml_str(&toml).unwrap();
        assert!(config.case_keys().is_empty());
    }
}
