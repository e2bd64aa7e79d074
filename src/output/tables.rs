use std::fmt::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::insights::RetryReport;

use super::styling::{bright, bright_green, bright_yellow, cyan, dim};

const RETRY_COLUMNS: [&str; 4] = ["Run", "Job", "Log lines", "Link"];

/// Rounded table with a cyan header row, wrapping to the terminal width.
fn retry_table() -> Table {
    let header: Vec<Cell> = RETRY_COLUMNS
        .iter()
        .map(|label| Cell::new(label).fg(TableColor::Cyan))
        .collect();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Prints the collect-versions retry findings to stdout.
pub fn print_retry_report(report: &RetryReport) {
    println!("{}", render_retry_report(report));
}

fn render_retry_report(report: &RetryReport) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} {}",
        bright("🔁"),
        bright("collect-versions retries").underlined()
    );
    let _ = writeln!(
        output,
        "  {} {}\n  {} {} to {}\n  {} {}\n",
        dim("Repository:"),
        cyan(&report.repository),
        dim("Analysis period:"),
        report.window.start.format("%Y-%m-%d %H:%M UTC"),
        report.window.end.format("%Y-%m-%d %H:%M UTC"),
        dim(format!("Processed '{}' steps:", report.target_step)),
        bright_yellow(report.processed_jobs)
    );

    if report.findings.is_empty() {
        let _ = writeln!(output, "{}", bright_green("No retried collect-versions runs found."));
        return output;
    }

    let mut table = retry_table();

    for finding in &report.findings {
        let lines = finding
            .scan
            .retry_successes
            .iter()
            .chain(&finding.scan.failures)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(finding.run_id),
            Cell::new(finding.job_id),
            Cell::new(lines),
            Cell::new(&finding.url),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::RetryFinding;
    use crate::logs::retries::RetryScan;
    use crate::window::TimeWindow;
    use chrono::Utc;

    fn report(findings: Vec<RetryFinding>) -> RetryReport {
        RetryReport {
            repository: "owner/repo".to_string(),
            collected_at: Utc::now(),
            window: TimeWindow::for_days(0).unwrap(),
            target_step: "Setup Project Dir".to_string(),
            processed_jobs: 4,
            findings,
        }
    }

    #[test]
    fn test_render_retry_report_empty() {
        let output = render_retry_report(&report(vec![]));

        assert!(output.contains("owner/repo"));
        assert!(output.contains("Processed 'Setup Project Dir' steps:"));
        assert!(output.contains("No retried collect-versions runs found."));
    }

    #[test]
    fn test_render_retry_report_lists_findings() {
        let output = render_retry_report(&report(vec![RetryFinding {
            run_id: 555,
            job_id: 777,
            url: "https://github.com/owner/repo/actions/runs/555".to_string(),
            scan: RetryScan {
                retry_successes: vec!["collect-versions succeeded on attempt 2".to_string()],
                failures: vec!["collect-versions failed".to_string()],
            },
        }]));

        assert!(output.contains("555"));
        assert!(output.contains("777"));
        assert!(output.contains("attempt"));
        assert!(output.contains("failed"));
        assert!(!output.contains("No retried collect-versions runs found."));
    }
}
