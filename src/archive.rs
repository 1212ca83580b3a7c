//! On-disk archive of nightly results
//!
//! A directory of `ctest-<YYYYMMDD>*.json` files, one per nightly run:
//!
//! ```json
//! {
//!   "tests": [
//!     {
//!       "name": "ant-2-20km_ml_line",
//!       "nps": 384,
//!       "passed": true,
//!       "timers": { "Albany: Total Time:": 812.4 }
//!     }
//!   ]
//! }
//! ```
//!
//! Files are ordered by the date stamp in their name, ties broken by name.

use crate::aggregate::{RunOutcomeSource, SeriesSource};
use crate::case::CaseKey;
use crate::error::{PerfError, Result};
use crate::regression::TimeSeries;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^ctest-(\d{8}).*\.json$").expect("archive file pattern is valid")
    })
}

/// One test entry inside a nightly results file
#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedTest {
    pub name: String,
    pub nps: u32,
    pub passed: bool,
    #[serde(default)]
    pub timers: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ArchiveFile {
    #[serde(default)]
    tests: Vec<ArchivedTest>,
}

/// Results of one nightly run
#[derive(Debug, Clone)]
pub struct NightlyRecord {
    /// YYYYMMDD stamp from the file name
    pub date: String,
    pub path: PathBuf,
    pub tests: Vec<ArchivedTest>,
}

impl NightlyRecord {
    fn find(&self, case: &CaseKey) -> Option<&ArchivedTest> {
        self.tests
            .iter()
            .find(|t| t.name == case.name && t.nps == case.nps)
    }
}

/// Chronologically ordered nightly results loaded from a directory
#[derive(Debug, Clone, Default)]
pub struct ResultArchive {
    records: Vec<NightlyRecord>,
}

/// Extract the YYYYMMDD stamp from an archive file name
pub fn date_stamp(file_name: &str) -> Option<&str> {
    file_name_pattern()
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

impl ResultArchive {
    /// Load every `ctest-*.json` file in `dir`; other files are ignored
    ///
    /// A results file that cannot be read or parsed is logged and skipped,
    /// so one bad night never blocks the report. Only failing to list the
    /// directory itself is an error.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut records = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(date) = date_stamp(file_name) else {
                continue;
            };

            match load_record(&path, date) {
                Ok(record) => records.push(record),
                Err(e) => warn!(error = %e, "skipping nightly results file"),
            }
        }

        info!(dir = %dir.display(), files = records.len(), "loaded result archive");
        Ok(Self::from_records(records))
    }

    /// Build an archive from records, sorting them chronologically
    pub fn from_records(mut records: Vec<NightlyRecord>) -> Self {
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
        Self { records }
    }

    /// View of the archive as it stood on the given YYYYMMDD run date
    ///
    /// Later nights are dropped, so the current run is the run date's record
    /// and no series carries samples from after it.
    pub fn as_of(&self, stamp: &str) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.date.as_str() <= stamp)
                .cloned()
                .collect(),
        }
    }

    pub fn records(&self) -> &[NightlyRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any results file exists for the given YYYYMMDD stamp
    pub fn has_date(&self, stamp: &str) -> bool {
        self.records.iter().any(|r| r.date == stamp)
    }

    fn latest(&self) -> Option<&NightlyRecord> {
        self.records.last()
    }
}

fn load_record(path: &Path, date: &str) -> Result<NightlyRecord> {
    debug!(path = %path.display(), "loading nightly results");
    let archive_error = |reason: String| PerfError::Archive {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| archive_error(e.to_string()))?;
    let parsed: ArchiveFile =
        serde_json::from_str(&content).map_err(|e| archive_error(e.to_string()))?;

    Ok(NightlyRecord {
        date: date.to_string(),
        path: path.to_path_buf(),
        tests: parsed.tests,
    })
}

impl RunOutcomeSource for ResultArchive {
    fn run_succeeded(&self, case: &CaseKey) -> Result<bool> {
        self.latest()
            .and_then(|record| record.find(case))
            .map(|test| test.passed)
            .ok_or_else(|| PerfError::MissingCase {
                case: case.to_string(),
            })
    }
}

impl SeriesSource for ResultArchive {
    fn series(&self, case: &CaseKey, timer: &str) -> Result<TimeSeries> {
        let missing = || PerfError::MissingTimer {
            case: case.to_string(),
            timer: timer.to_string(),
        };

        // The newest sample must come from the latest run
        let current = self
            .latest()
            .and_then(|record| record.find(case))
            .and_then(|test| test.timers.get(timer));
        if current.is_none() {
            return Err(missing());
        }

        Ok(self
            .records
            .iter()
            .filter_map(|record| record.find(case))
            .filter_map(|test| test.timers.get(timer).copied())
            .collect())
    }
}
