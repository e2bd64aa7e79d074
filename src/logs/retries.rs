//! Detection of `collect-versions` retries inside the project setup section
//! of a job log.

use serde::Serialize;

pub const SECTION_START: &str = "actions/setup/setup-project";
pub const SECTION_END: &str = "actions/reports/report-to-weebl";

const SUCCESS_PHRASE: &str = "collect-versions succeeded on attempt";
const FAILURE_PHRASE: &str = "collect-versions failed";

/// Matching lines found in one job log, trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetryScan {
    /// Successes that needed more than one attempt.
    pub retry_successes: Vec<String>,
    /// Failed attempts, kept for context.
    pub failures: Vec<String>,
}

impl RetryScan {
    pub fn has_retries(&self) -> bool {
        !self.retry_successes.is_empty()
    }
}

/// Returns the lines from the first [`SECTION_START`] line up to, but not
/// including, the next [`SECTION_END`] line.
pub fn find_section<'a, 'b>(lines: &'b [&'a str]) -> Option<&'b [&'a str]> {
    let start = lines.iter().position(|line| line.contains(SECTION_START))?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| line.contains(SECTION_END))
        .map(|offset| start + 1 + offset)?;
    Some(&lines[start..end])
}

/// Attempt number following the success phrase, tolerating trailing
/// punctuation such as `3.`.
fn attempt_number(line: &str) -> Option<u32> {
    let (_, rest) = line.split_once(SUCCESS_PHRASE)?;
    let token = rest.split_whitespace().next()?;
    token
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()
}

/// Collects retry successes (attempt > 1) and failures. Lines that echo the
/// phrases back, such as the script source, are ignored.
pub fn scan_lines(lines: &[&str]) -> RetryScan {
    let mut scan = RetryScan::default();

    for line in lines.iter().filter(|line| !line.contains("echo")) {
        if line.contains(SUCCESS_PHRASE) {
            if attempt_number(line).is_some_and(|attempt| attempt > 1) {
                scan.retry_successes.push(line.trim().to_string());
            }
        } else if line.contains(FAILURE_PHRASE) {
            scan.failures.push(line.trim().to_string());
        }
    }

    scan
}

/// Scans the setup section of a raw job log. `None` when the section
/// markers are missing.
pub fn scan_log(log: &str) -> Option<RetryScan> {
    let lines: Vec<&str> = log.lines().collect();
    find_section(&lines).map(scan_lines)
}
