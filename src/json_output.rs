//! JSON export of a nightly report
//!
//! Machine-readable companion to the HTML document, for dashboards and
//! archival (`--report-json`).

use crate::regression::RegressionConfig;
use crate::report::{CaseResult, Report};
use serde::Serialize;

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Run date stamp (YYYYMMDD)
    pub date: String,
    /// Classification settings used for this run
    pub regression: &'a RegressionConfig,
    /// "failed" or "passed", matching the subject tag
    pub overall: &'static str,
    /// Case results in configured order
    pub cases: &'a [CaseResult],
}

impl<'a> JsonReport<'a> {
    pub fn new(
        report: &'a Report,
        regression: &'a RegressionConfig,
        date: impl Into<String>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "perfwatch-json-v1".to_string(),
            date: date.into(),
            regression,
            overall: if report.has_failures() {
                "failed"
            } else {
                "passed"
            },
            cases: report.cases(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseKey;
    use crate::regression::{Classification, PerfStatus};
    use crate::report::TimerRecord;

    #[test]
    fn test_json_report_shape() {
        let report = Report::new(vec![
            CaseResult::ran(
                CaseKey::new("cube", 4),
                vec![TimerRecord::measured(
                    "Total Time:",
                    Classification {
                        status: PerfStatus::Warn,
                        measured: 15.0,
                        mean: 11.0,
                        std: 2.0,
                    },
                )],
            ),
            CaseResult::did_not_run(CaseKey::new("slab", 4), None),
        ])
        .unwrap();
        let config = RegressionConfig::default();
        let json = JsonReport::new(&report, &config, "20240307").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["format"], "perfwatch-json-v1");
        assert_eq!(value["date"], "20240307");
        assert_eq!(value["overall"], "failed");
        assert_eq!(value["regression"]["threshold_coeff"], 2.0);

        let cases = value["cases"].as_array().unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0]["key"]["name"], "cube");
        assert_eq!(cases[0]["run"], "ran");
        assert_eq!(cases[0]["tally"]["warn"], 1);
        assert_eq!(cases[0]["timers"][0]["name"], "Total Time:");
        assert_eq!(cases[0]["timers"][0]["outcome"], "measured");
        assert_eq!(cases[0]["timers"][0]["status"], "warn");
        assert_eq!(cases[1]["run"], "did_not_run");
        assert!(cases[1].get("timers").is_none());
    }

    #[test]
    fn test_empty_report_passes() {
        let report = Report::new(vec![]).unwrap();
        let config = RegressionConfig::default();
        let json = JsonReport::new(&report, &config, "20240307");
        assert_eq!(json.overall, "passed");
        assert!(json.cases.is_empty());
    }
}
