//! Error taxonomy for the nightly performance pipeline
//!
//! Per-timer errors (`InsufficientData`, `MissingTimer`, `Statistics`) are
//! recorded inside the report instead of aborting it. `DataAbsence` is the
//! only error allowed to stop a whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while classifying, aggregating, or loading nightly results
#[derive(Error, Debug)]
pub enum PerfError {
    #[error("insufficient data: need at least 2 samples, got {samples}")]
    InsufficientData { samples: usize },

    #[error("no data for timer '{timer}' in case {case}")]
    MissingTimer { case: String, timer: String },

    #[error("case {case} not found in the latest results")]
    MissingCase { case: String },

    #[error("no results exist for run date {date}")]
    DataAbsence { date: String },

    #[error("duplicate case in report: {case}")]
    DuplicateCase { case: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("statistics failure: {0}")]
    Statistics(String),

    #[error("bad archive file {}: {reason}", .path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for perfwatch operations
pub type Result<T> = std::result::Result<T, PerfError>;

impl PerfError {
    /// Short machine-readable tag, used in JSON export and HTML error rows
    pub fn kind(&self) -> &'static str {
        match self {
            PerfError::InsufficientData { .. } => "insufficient_data",
            PerfError::MissingTimer { .. } => "missing_timer",
            PerfError::MissingCase { .. } => "missing_case",
            PerfError::DataAbsence { .. } => "data_absence",
            PerfError::DuplicateCase { .. } => "duplicate_case",
            PerfError::InvalidConfig(_) => "invalid_config",
            PerfError::Statistics(_) => "statistics",
            PerfError::Archive { .. } => "archive",
            PerfError::Io(_) => "io",
            PerfError::Json(_) => "json",
            PerfError::Toml(_) => "toml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = PerfError::InsufficientData { samples: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 2 samples, got 1"
        );
        assert_eq!(err.kind(), "insufficient_data");
    }

    #[test]
    fn test_missing_timer_message_keeps_timer_verbatim() {
        let err = PerfError::MissingTimer {
            case: "ant-2-20km_ml_line_np384".to_string(),
            timer: "Albany: **Total Fill Time**:".to_string(),
        };
        assert!(err.to_string().contains("'Albany: **Total Fill Time**:'"));
        assert!(err.to_string().contains("ant-2-20km_ml_line_np384"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PerfError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
