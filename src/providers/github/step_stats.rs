use chrono::Utc;
use indexmap::IndexMap;

use crate::insights::{StepReport, StepStats, StepSummary};
use crate::steps::{StepCatalog, StepDefinition};
use crate::window::TimeWindow;

use super::types::GitHubJob;

/// Whether a job counts toward the analysis: completed inside the window
/// and, unless `include_cancelled` is set, not cancelled.
pub fn job_in_scope(job: &GitHubJob, window: &TimeWindow, include_cancelled: bool) -> bool {
    let completed_in_window = job.completed_at.is_some_and(|at| window.contains(at));
    completed_in_window && (include_cancelled || !job.is_cancelled())
}

/// A failed configured step, with what should be done about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure<'a> {
    pub step: &'a StepDefinition,
    /// Step number within the job, for the step link anchor.
    pub number: u32,
}

impl StepFailure<'_> {
    pub fn show_url(&self) -> bool {
        self.step.show_url
    }

    pub fn log_search(&self) -> Option<&str> {
        self.step.log_search()
    }
}

/// Tallies step conclusions for the configured steps.
pub struct StepAggregator<'a> {
    catalog: &'a StepCatalog,
    stats: IndexMap<String, StepStats>,
    processed_jobs: usize,
}

impl<'a> StepAggregator<'a> {
    /// Every configured step starts at zero so it is reported even when
    /// never observed.
    pub fn new(catalog: &'a StepCatalog) -> Self {
        let stats = catalog
            .iter()
            .map(|step| (step.name.clone(), StepStats::default()))
            .collect();

        Self {
            catalog,
            stats,
            processed_jobs: 0,
        }
    }

    /// Records the steps of an in-scope job and returns the configured steps
    /// that failed in it. Unknown, skipped and unconcluded steps are ignored.
    pub fn record_job(&mut self, job: &GitHubJob) -> Vec<StepFailure<'a>> {
        let catalog = self.catalog;
        self.processed_jobs += 1;
        let mut failures = Vec::new();

        for step in &job.steps {
            let Some(definition) = catalog.get(&step.name) else {
                continue;
            };
            if !step.was_executed() {
                continue;
            }
            let conclusion = step.conclusion.as_deref().unwrap_or_default();

            if let Some(stats) = self.stats.get_mut(&step.name) {
                stats.record(conclusion);
            }

            if conclusion == "failure" {
                failures.push(StepFailure {
                    step: definition,
                    number: step.number,
                });
            }
        }

        failures
    }

    pub fn processed_jobs(&self) -> usize {
        self.processed_jobs
    }

    pub fn into_report(
        self,
        repository: String,
        window: TimeWindow,
        notices: Vec<String>,
    ) -> StepReport {
        let steps = self
            .catalog
            .iter()
            .map(|step| {
                let stats = self.stats.get(&step.name).copied().unwrap_or_default();
                StepSummary {
                    name: step.name.clone(),
                    order: step.order,
                    total: stats.total,
                    success: stats.success,
                    failure: stats.failure,
                    success_rate: stats.success_rate(),
                }
            })
            .collect();

        StepReport {
            provider: "GitHub Actions".to_string(),
            repository,
            collected_at: Utc::now(),
            window,
            processed_jobs: self.processed_jobs,
            steps,
            notices,
        }
    }
}

#[cfg(test)]
impl StepAggregator<'_> {
    pub fn stats(&self, name: &str) -> Option<&StepStats> {
        self.stats.get(name)
    }
}
