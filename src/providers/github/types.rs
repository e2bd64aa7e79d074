use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GitHub Actions workflow run. Only the fields the analysis reads.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubWorkflowRun {
    /// Unique identifier for the workflow run
    pub id: u64,
    /// Name of the workflow
    #[serde(default)]
    pub name: Option<String>,
    /// Status of the run (queued, in_progress, completed)
    #[serde(default)]
    pub status: Option<String>,
}

impl GitHubWorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }

    pub fn name_starts_with(&self, prefix: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.starts_with(prefix))
    }
}

/// Job within a GitHub Actions workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubJob {
    /// Unique identifier for the job
    pub id: u64,
    /// Run this job belongs to
    pub run_id: u64,
    /// Conclusion of the job
    #[serde(default)]
    pub conclusion: Option<String>,
    /// When the job completed
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Steps in this job
    #[serde(default)]
    pub steps: Vec<GitHubStep>,
}

impl GitHubJob {
    pub fn is_cancelled(&self) -> bool {
        self.conclusion.as_deref() == Some("cancelled")
    }
}

/// Step within a GitHub Actions job.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubStep {
    /// Name of the step
    pub name: String,
    /// Conclusion of the step
    #[serde(default)]
    pub conclusion: Option<String>,
    /// Step number, used for anchors in step links
    #[serde(default)]
    pub number: u32,
}

impl GitHubStep {
    /// Whether the step actually ran to a conclusion.
    pub fn was_executed(&self) -> bool {
        matches!(self.conclusion.as_deref(), Some(c) if !c.is_empty() && c != "skipped")
    }
}

/// Response from GitHub API for workflow runs.
#[derive(Debug, Deserialize)]
pub(super) struct WorkflowRunsResponse {
    #[serde(default)]
    pub workflow_runs: Vec<GitHubWorkflowRun>,
}

/// Response from GitHub API for workflow jobs.
#[derive(Debug, Deserialize)]
pub(super) struct WorkflowJobsResponse {
    #[serde(default)]
    pub jobs: Vec<GitHubJob>,
}
