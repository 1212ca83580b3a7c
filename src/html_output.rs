//! HTML status report for a nightly performance run
//!
//! Pure rendering: a `Report` goes in, a subject line and an HTML body come
//! out. Nothing here touches the filesystem or the clock.

use crate::report::{CaseOutcome, CaseResult, Report, StatusColor, TimerOutcome, TimerRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder expanded with the run date (`MM_DD_YYYY`) in archive links
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Contextual links appended to the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLinks {
    /// Test log viewer
    pub logs: Option<String>,
    /// Archived detailed report; may contain `{date}`
    pub archive: Option<String>,
    /// Interactive notebook viewer
    pub notebook: Option<String>,
    /// Data repository
    pub repo: Option<String>,
}

impl ReportLinks {
    /// Expand `{date}` in every link for the given run date
    pub fn for_date(&self, date: NaiveDate) -> ReportLinks {
        let stamp = date.format("%m_%d_%Y").to_string();
        let expand =
            |link: &Option<String>| link.as_ref().map(|l| l.replace(DATE_PLACEHOLDER, &stamp));
        ReportLinks {
            logs: expand(&self.logs),
            archive: expand(&self.archive),
            notebook: expand(&self.notebook),
            repo: expand(&self.repo),
        }
    }
}

/// Title and tagging used when rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Report title, also the untagged subject line
    pub title: String,
    /// Subject tags become `[<prefix>Failed]` / `[<prefix>Passed]`
    pub tag_prefix: String,
    pub links: ReportLinks,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Performance Tests".to_string(),
            tag_prefix: "PerfTests".to_string(),
            links: ReportLinks::default(),
        }
    }
}

impl RenderOptions {
    /// Subject line for a failed or passed run
    pub fn subject(&self, failed: bool) -> String {
        let outcome = if failed { "Failed" } else { "Passed" };
        format!("[{}{}] {}", self.tag_prefix, outcome, self.title)
    }
}

/// Rendered document ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReport {
    pub subject: String,
    pub body: String,
}

/// Escape HTML special characters
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format seconds with six significant digits, like C's `%g`
pub fn format_seconds(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let exp = value.abs().log10().floor() as i32;
    if !(-4..6).contains(&exp) {
        return format!("{:e}", value);
    }

    let decimals = (5 - exp).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Generate embedded CSS styles
fn generate_styles() -> &'static str {
    r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
        }
        table, th, td {
            border: 2px solid black;
            text-align: center;
        }
        table {
            border-collapse: collapse;
            width: 90%;
            margin-bottom: 20px;
        }
        caption {
            font-size: 1.4em;
            font-weight: bold;
        }
        th {
            color: white;
            background-color: gray;
        }
        td {
            height: 40px;
        }
        tr:nth-child(even) {
            background-color: #D0D0D0;
        }
        tr:nth-child(odd) {
            background-color: #F0F0F0;
        }
        .green {
            background-color: green;
            color: white;
        }
        .yellow {
            background-color: yellow;
        }
        .red {
            background-color: red;
            color: white;
        }
        .notice {
            font-size: 1.2em;
        }
        "#
}

fn summary_row(case: &CaseResult) -> String {
    let name = escape_html(&case.key.to_string());
    match &case.outcome {
        CaseOutcome::Ran { tally, .. } => format!(
            "        <tr><td>{}</td><td class=\"green\">Passed</td><td class=\"{}\">{}</td></tr>\n",
            name,
            tally.color(),
            tally
        ),
        CaseOutcome::DidNotRun { .. } => format!(
            "        <tr><td>{}</td><td class=\"red\">Failed</td><td class=\"red\">Failed</td></tr>\n",
            name
        ),
    }
}

fn render_summary(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("    <table class=\"summary\">\n");
    html.push_str("        <caption>Status</caption>\n");
    html.push_str("        <tr><th>Name</th><th>Run Test</th><th>Performance Tests (Passes/Warnings/Fails)</th></tr>\n");
    for case in report.cases() {
        html.push_str(&summary_row(case));
    }
    html.push_str("    </table>\n");
    html
}

fn timer_row(timer: &TimerRecord) -> String {
    let name = escape_html(&timer.name);
    match &timer.outcome {
        TimerOutcome::Measured(result) => format!(
            "        <tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
            name,
            StatusColor::from(result.status),
            format_seconds(result.measured),
            format_seconds(result.mean),
            format_seconds(result.std)
        ),
        TimerOutcome::Error(err) => format!(
            "        <tr><td>{}</td><td class=\"red\" colspan=\"3\">Error: {}</td></tr>\n",
            name,
            escape_html(&err.message)
        ),
    }
}

fn render_case_detail(case: &CaseResult) -> String {
    let name = escape_html(&case.key.to_string());
    let mut html = String::new();

    match &case.outcome {
        CaseOutcome::DidNotRun { reason } => {
            html.push_str(&format!(
                "    <p class=\"notice\">{} test failed...</p>\n",
                name
            ));
            if let Some(reason) = reason {
                html.push_str(&format!(
                    "    <p class=\"reason\">Reason: {}</p>\n",
                    escape_html(reason)
                ));
            }
        }
        CaseOutcome::Ran { timers, .. } => {
            html.push_str("    <table class=\"timers\">\n");
            html.push_str(&format!("        <caption>{} Timers (s)</caption>\n", name));
            html.push_str("        <tr><th>Timer</th><th>Measured</th><th>Mean</th><th>Std</th></tr>\n");
            for timer in timers {
                html.push_str(&timer_row(timer));
            }
            html.push_str("    </table>\n");
        }
    }

    html
}

fn render_links(links: &ReportLinks) -> String {
    let parts: Vec<String> = [
        (&links.logs, "test logs"),
        (&links.archive, "more details on performance"),
        (&links.notebook, "an interactive notebook of the data"),
        (&links.repo, "the data repository"),
    ]
    .into_iter()
    .filter_map(|(link, what)| {
        link.as_ref()
            .map(|url| format!("<a href=\"{}\">here</a> for {}", escape_html(url), what))
    })
    .collect();

    if parts.is_empty() {
        return String::new();
    }

    format!("    <p>Click {}.</p>\n", parts.join(", "))
}

fn document(title: &str, content: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    html.push_str("    <style>");
    html.push_str(generate_styles());
    html.push_str("</style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str(content);
    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

/// Render the status report
///
/// The body holds the summary table (one row per case, report order)
/// followed by one detail section per case in the same order. The subject is
/// tagged failed if any case or timer anywhere in the report is red.
pub fn render(report: &Report, options: &RenderOptions) -> RenderedReport {
    let mut content = String::new();
    content.push_str(&format!(
        "    <h1>{} Status Report</h1>\n",
        escape_html(&options.title)
    ));
    content.push_str(&render_summary(report));
    for case in report.cases() {
        content.push_str(&render_case_detail(case));
    }
    content.push_str(&render_links(&options.links));

    RenderedReport {
        subject: options.subject(report.has_failures()),
        body: document(&options.title, &content),
    }
}

/// Fixed failure document sent when no results exist for the run date
pub fn render_data_absence(options: &RenderOptions) -> RenderedReport {
    let mut content = String::new();
    content.push_str("    <p><b>Error: Today's results file doesn't exist!</b></p>\n");
    let links = ReportLinks {
        logs: options.links.logs.clone(),
        repo: options.links.repo.clone(),
        ..ReportLinks::default()
    };
    content.push_str(&render_links(&links));

    RenderedReport {
        subject: options.subject(true),
        body: document(&options.title, &content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseKey;
    use crate::error::PerfError;
    use crate::regression::{Classification, PerfStatus};

    fn timer(name: &str, status: PerfStatus) -> TimerRecord {
        TimerRecord::measured(
            name,
            Classification {
                status,
                measured: 15.0,
                mean: 11.0,
                std: 2.0,
            },
        )
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "0");
        assert_eq!(format_seconds(15.0), "15");
        assert_eq!(format_seconds(0.5), "0.5");
        assert_eq!(format_seconds(123.456), "123.456");
        assert_eq!(format_seconds(2.0), "2");
    }

    #[test]
    fn test_subject_tags() {
        let options = RenderOptions {
            title: "Land Ice Performance Tests".to_string(),
            tag_prefix: "ALIPerfTests".to_string(),
            links: ReportLinks::default(),
        };
        assert_eq!(
            options.subject(true),
            "[ALIPerfTestsFailed] Land Ice Performance Tests"
        );
        assert_eq!(
            options.subject(false),
            "[ALIPerfTestsPassed] Land Ice Performance Tests"
        );
    }

    #[test]
    fn test_basic_structure() {
        let report = Report::new(vec![]).unwrap();
        let rendered = render(&report, &RenderOptions::default());
        assert!(rendered.body.contains("<!DOCTYPE html>"));
        assert!(rendered.body.contains("<style>"));
        assert!(rendered.body.contains("<caption>Status</caption>"));
        assert!(rendered.body.ends_with("</html>\n"));
    }

    #[test]
    fn test_summary_row_for_ran_case() {
        let case = CaseResult::ran(
            CaseKey::new("cube", 4),
            vec![timer("Total", PerfStatus::Pass), timer("Solve", PerfStatus::Warn)],
        );
        let row = summary_row(&case);
        assert!(row.contains("cube_np4"));
        assert!(row.contains("<td class=\"green\">Passed</td>"));
        assert!(row.contains("<td class=\"yellow\">1/1/0</td>"));
    }

    #[test]
    fn test_summary_row_for_failed_case() {
        let case = CaseResult::did_not_run(CaseKey::new("cube", 4), None);
        let row = summary_row(&case);
        assert!(row.contains("<td class=\"red\">Failed</td><td class=\"red\">Failed</td>"));
    }

    #[test]
    fn test_timer_row_values() {
        let row = timer_row(&timer("Albany: Total Time:", PerfStatus::Warn));
        assert!(row.contains("Albany: Total Time:"));
        assert!(row.contains("<td class=\"yellow\">15</td><td>11</td><td>2</td>"));
    }

    #[test]
    fn test_timer_error_row() {
        let err = PerfError::MissingTimer {
            case: "cube_np4".to_string(),
            timer: "<Solve>".to_string(),
        };
        let row = timer_row(&TimerRecord::error("<Solve>", &err));
        assert!(row.contains("class=\"red\" colspan=\"3\""));
        assert!(row.contains("&lt;Solve&gt;"));
        assert!(!row.contains("<Solve>"));
    }

    #[test]
    fn test_case_detail_failed_notice() {
        let case = CaseResult::did_not_run(
            CaseKey::new("cube", 4),
            Some("case cube_np4 not found".to_string()),
        );
        let html = render_case_detail(&case);
        assert!(html.contains("cube_np4 test failed..."));
        assert!(html.contains("<p class=\"reason\">Reason: case cube_np4 not found</p>"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_case_detail_failed_run_without_reason() {
        let case = CaseResult::did_not_run(CaseKey::new("cube", 4), None);
        let html = render_case_detail(&case);
        assert!(html.contains("cube_np4 test failed..."));
        assert!(!html.contains("Reason:"));
    }

    #[test]
    fn test_links_expand_date() {
        let links = ReportLinks {
            archive: Some("https://example.org/Perf_{date}.html".to_string()),
            ..ReportLinks::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            links.for_date(date).archive.as_deref(),
            Some("https://example.org/Perf_03_07_2024.html")
        );
    }

    #[test]
    fn test_links_paragraph() {
        let links = ReportLinks {
            logs: Some("https://logs.example.org".to_string()),
            notebook: Some("https://nb.example.org".to_string()),
            ..ReportLinks::default()
        };
        let html = render_links(&links);
        assert!(html.contains("<a href=\"https://logs.example.org\">here</a> for test logs"));
        assert!(html.contains("an interactive notebook of the data"));
        assert!(!html.contains("more details"));
        assert!(render_links(&ReportLinks::default()).is_empty());
    }

    #[test]
    fn test_data_absence_is_failed() {
        let options = RenderOptions {
            links: ReportLinks {
                logs: Some("https://logs.example.org".to_string()),
                archive: Some("https://archive.example.org".to_string()),
                ..ReportLinks::default()
            },
            ..RenderOptions::default()
        };
        let rendered = render_data_absence(&options);
        assert_eq!(rendered.subject, "[PerfTestsFailed] Performance Tests");
        assert!(rendered.body.contains("doesn't exist"));
        assert!(rendered.body.contains("https://logs.example.org"));
        assert!(!rendered.body.contains("https://archive.example.org"));
    }
}
