//! Perfwatch - nightly performance regression classifier
//!
//! This library classifies the newest run of each benchmark timer as
//! pass/warn/fail against its own history, rolls the results up per case,
//! and renders a status report with a pass/fail tagged subject line.

pub mod aggregate;
pub mod archive;
pub mod case;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod html_output;
pub mod json_output;
pub mod pipeline;
pub mod regression;
pub mod report;

pub use error::{PerfError, Result};
