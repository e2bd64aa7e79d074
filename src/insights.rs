use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logs::retries::RetryScan;
use crate::window::TimeWindow;

/// Outcome counters for one configured step.
///
/// `success + failure <= total`: conclusions such as `cancelled` or
/// `timed_out` count toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

impl StepStats {
    pub fn record(&mut self, conclusion: &str) {
        self.total += 1;
        match conclusion {
            "success" => self.success += 1,
            "failure" => self.failure += 1,
            _ => {}
        }
    }

    pub fn success_rate(&self) -> f64 {
        calculate_rate(self.success, self.total)
    }
}

/// Calculates a percentage rate, returning 0.0 when `total` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn calculate_rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub name: String,
    pub order: usize,
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    pub success_rate: f64,
}

/// Aggregated step statistics for one invocation, in configured step order.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub provider: String,
    pub repository: String,
    pub collected_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub processed_jobs: usize,
    pub steps: Vec<StepSummary>,
    /// Lines printed while collecting: failed step links and the outcome of
    /// every log excerpt attempt.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetryFinding {
    pub run_id: u64,
    pub job_id: u64,
    pub url: String,
    #[serde(flatten)]
    pub scan: RetryScan,
}

/// Jobs whose setup section needed more than one `collect-versions` attempt.
#[derive(Debug, Clone, Serialize)]
pub struct RetryReport {
    pub repository: String,
    pub collected_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub target_step: String,
    pub processed_jobs: usize,
    pub findings: Vec<RetryFinding>,
}
