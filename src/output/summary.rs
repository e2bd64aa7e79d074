use std::fmt::Write;

use crate::insights::StepReport;

use super::styling::{bright, success_rate};

const RULE_WIDTH: usize = 60;
const NAME_WIDTH: usize = 40;

/// Prints the step statistics table to stdout.
///
/// Rows follow the order of the step definition file. Step names are cut
/// to 39 characters so the columns stay aligned.
pub fn print_summary(report: &StepReport) {
    print!("{}", render_summary(report));
}

fn truncate_name(name: &str) -> String {
    name.chars().take(NAME_WIDTH - 1).collect()
}

fn render_summary(report: &StepReport) -> String {
    let mut output = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let thin_rule = "-".repeat(RULE_WIDTH);

    let _ = writeln!(output, "\n{rule}");
    let _ = writeln!(output, "{}", bright("GITHUB ACTIONS WORKFLOW ANALYSIS SUMMARY"));
    let _ = writeln!(output, "{rule}");
    let _ = writeln!(output, "Repository: {}", report.repository);
    let _ = writeln!(
        output,
        "Analysis Period: {} to {}",
        report.window.start.format("%Y-%m-%d"),
        report.window.end.format("%Y-%m-%d")
    );
    let _ = writeln!(output, "Processed Jobs: {}", report.processed_jobs);
    let _ = writeln!(output);

    if report.steps.is_empty() {
        let _ = writeln!(output, "No steps found in the specified time period.");
        return output;
    }

    let _ = writeln!(output, "STEP EXECUTION STATISTICS:");
    let _ = writeln!(output, "{thin_rule}");
    let _ = writeln!(
        output,
        "{:<NAME_WIDTH$} {:<8} {:<8} {:<8} {}",
        "Step Name", "Total", "Success", "Failure", "Success %"
    );
    let _ = writeln!(output, "{thin_rule}");

    for step in &report.steps {
        let _ = writeln!(
            output,
            "{:<NAME_WIDTH$} {:<8} {:<8} {:<8} {}",
            truncate_name(&step.name),
            step.total,
            step.success,
            step.failure,
            success_rate(step.success_rate, step.total)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::StepSummary;
    use crate::window::TimeWindow;
    use chrono::{TimeZone, Utc};

    fn summary(name: &str, order: usize, total: usize, success: usize, failure: usize) -> StepSummary {
        StepSummary {
            name: name.to_string(),
            order,
            total,
            success,
            failure,
            success_rate: crate::insights::calculate_rate(success, total),
        }
    }

    fn report(steps: Vec<StepSummary>) -> StepReport {
        StepReport {
            provider: "GitHub Actions".to_string(),
            repository: "owner/repo".to_string(),
            collected_at: Utc::now(),
            window: TimeWindow::for_days_at(7, Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()).unwrap(),
            processed_jobs: 12,
            steps,
            notices: Vec::new(),
        }
    }

    #[test]
    fn test_render_summary_header() {
        let output = render_summary(&report(vec![]));

        assert!(output.contains("WORKFLOW ANALYSIS SUMMARY"));
        assert!(output.contains("Repository: owner/repo"));
        assert!(output.contains("Analysis Period: 2024-03-08 to 2024-03-15"));
        assert!(output.contains("Processed Jobs: 12"));
    }

    #[test]
    fn test_render_summary_without_steps() {
        let output = render_summary(&report(vec![]));

        assert!(output.contains("No steps found in the specified time period."));
        assert!(!output.contains("STEP EXECUTION STATISTICS"));
    }

    #[test]
    fn test_render_summary_rows_are_fixed_width() {
        let output = render_summary(&report(vec![
            summary("Setup Project Dir", 0, 1, 1, 0),
            summary("Build", 1, 3, 2, 1),
            summary("Test", 2, 0, 0, 0),
        ]));

        let expected_setup = format!(
            "{:<40} {:<8} {:<8} {:<8} {}",
            "Setup Project Dir",
            1,
            1,
            0,
            success_rate(100.0, 1)
        );
        assert!(output.contains(&expected_setup), "{output}");
        let expected_build = format!(
            "{:<40} {:<8} {:<8} {:<8} {}",
            "Build",
            3,
            2,
            1,
            success_rate(200.0 / 3.0, 3)
        );
        assert!(output.contains(&expected_build), "{output}");
        let expected_test = format!(
            "{:<40} {:<8} {:<8} {:<8} {}",
            "Test",
            0,
            0,
            0,
            success_rate(0.0, 0)
        );
        assert!(output.contains(&expected_test), "{output}");
    }

    #[test]
    fn test_render_summary_keeps_configured_order() {
        let output = render_summary(&report(vec![
            summary("Zeta", 0, 1, 1, 0),
            summary("Alpha", 1, 5, 0, 5),
        ]));

        let zeta = output.find("Zeta").unwrap();
        let alpha = output.find("Alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_render_summary_truncates_long_names() {
        let long_name = "A".repeat(50);
        let output = render_summary(&report(vec![summary(&long_name, 0, 1, 1, 0)]));

        assert!(output.contains(&format!("{}  1", "A".repeat(39))));
        assert!(!output.contains(&"A".repeat(40)));
    }
}
