use chrono::Utc;
use log::{debug, info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::insights::{RetryFinding, RetryReport, StepReport};
use crate::logs::{extract_excerpt, retries, ExcerptFile, LogStore};
use crate::output::{print_status, RunProgress};
use crate::steps::{StepCatalog, StepDefinition};
use crate::window::TimeWindow;

use super::client::GitHubClient;
use super::links;
use super::step_stats::{job_in_scope, StepAggregator};
use super::types::{GitHubJob, GitHubWorkflowRun};

/// Collects step statistics and log excerpts from GitHub Actions.
///
/// Runs are processed one after another; each run costs one jobs request,
/// plus one log download per qualifying failure.
pub struct GitHubProvider {
    client: GitHubClient,
    settings: Settings,
}

impl GitHubProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be configured.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = GitHubClient::new(
            &settings.api_url,
            settings.repository.clone(),
            settings.token.clone(),
        )?;

        Ok(Self { client, settings })
    }

    /// Completed runs created inside `window` whose name carries the
    /// configured prefix, in provider order.
    async fn matching_runs(&self, window: &TimeWindow) -> Result<Vec<GitHubWorkflowRun>> {
        print_status(format!(
            "Analyzing workflow runs from {} to {}",
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        ));

        let runs: Vec<_> = self
            .client
            .fetch_workflow_runs(window)
            .await?
            .into_iter()
            .filter(|run| run.is_completed() && run.name_starts_with(&self.settings.run_prefix))
            .collect();

        print_status(format!("{} workflow runs found.", runs.len()));
        Ok(runs)
    }

    /// The first job of a run, if it is in scope for `window`.
    async fn representative_job(
        &self,
        run: &GitHubWorkflowRun,
        window: &TimeWindow,
    ) -> Result<Option<GitHubJob>> {
        let Some(job) = self.client.fetch_jobs_for_run(run.id).await?.into_iter().next() else {
            debug!("Run {} has no jobs, skipping", run.id);
            return Ok(None);
        };

        if job_in_scope(&job, window, self.settings.include_cancelled) {
            Ok(Some(job))
        } else {
            debug!("Job {} of run {} is out of scope", job.id, run.id);
            Ok(None)
        }
    }

    /// Tallies configured step outcomes over the first job of every matching run.
    ///
    /// Failed steps flagged with `show_url` print a link to the step; steps
    /// flagged with `download_logs` get a log excerpt written under the
    /// configured logs directory, which is purged once up front.
    ///
    /// # Errors
    ///
    /// Returns an error if listing runs or jobs fails. Log download problems
    /// are reported inline and kept in [`StepReport::notices`]; they never
    /// abort the analysis.
    pub async fn collect_step_stats(
        &self,
        catalog: &StepCatalog,
        window: &TimeWindow,
    ) -> Result<StepReport> {
        info!(
            "Collecting step statistics for {} ({} steps)",
            self.settings.repository,
            catalog.len()
        );

        let store = LogStore::new(&self.settings.logs_dir);
        if catalog.wants_logs() {
            store.reset()?;
        }

        let runs = self.matching_runs(window).await?;
        let progress = RunProgress::new(runs.len(), self.settings.show_progress);
        let mut aggregator = StepAggregator::new(catalog);
        let mut notices = Vec::new();

        for run in &runs {
            progress.advance();

            let Some(job) = self.representative_job(run, window).await? else {
                continue;
            };

            for failure in aggregator.record_job(&job) {
                if failure.show_url() {
                    let notice = format!(
                        "Step '{}' failed: {}",
                        failure.step.name,
                        links::step_url(
                            &self.settings.web_url,
                            &self.settings.repository,
                            job.run_id,
                            job.id,
                            failure.number,
                        )
                    );
                    progress.println(&notice);
                    notices.push(notice);
                }

                if let Some(search) = failure.log_search() {
                    let notice = self
                        .save_failure_log(&store, &job, failure.step, search)
                        .await;
                    progress.println(&notice);
                    notices.push(notice);
                }
            }
        }

        progress.finish();
        info!("Processed {} jobs", aggregator.processed_jobs());

        Ok(aggregator.into_report(self.settings.repository.to_string(), *window, notices))
    }

    /// Downloads the job log and writes the excerpt for one failed step.
    /// Returns the line describing the outcome.
    async fn save_failure_log(
        &self,
        store: &LogStore,
        job: &GitHubJob,
        step: &StepDefinition,
        search: &str,
    ) -> String {
        let run_url = links::run_url(&self.settings.web_url, &self.settings.repository, job.run_id);

        let log = match self.client.fetch_job_log(job.id).await {
            Ok(log) => log,
            Err(err) => {
                warn!("Log download failed for job {}: {err}", job.id);
                return format!(
                    "Failed to download logs for job {} of run {}: {err}, see {run_url}",
                    job.id, job.run_id
                );
            }
        };

        let lines = match extract_excerpt(&log, search) {
            Ok(lines) => lines,
            Err(miss) => {
                return format!("Step '{}' in job {}: {miss}, see {run_url}", step.name, job.id);
            }
        };

        let excerpt = ExcerptFile {
            step_name: &step.name,
            run_id: job.run_id,
            job_id: job.id,
            search_string: search,
            downloaded_at: Utc::now(),
            lines: &lines,
        };

        match store.write(&excerpt) {
            Ok(path) => format!(
                "Saved {} log lines for step '{}' to {}",
                lines.len(),
                step.name,
                path.display()
            ),
            Err(err) => {
                warn!(
                    "Could not write log excerpt to {}: {err}",
                    store.dir().display()
                );
                format!("Could not save log excerpt for step '{}': {err}, see {run_url}", step.name)
            }
        }
    }

    /// Looks for `collect-versions` retries in the logs of jobs whose
    /// `target_step` actually ran.
    ///
    /// # Errors
    ///
    /// Returns an error if listing runs or jobs fails.
    pub async fn collect_retries(
        &self,
        window: &TimeWindow,
        target_step: &str,
    ) -> Result<RetryReport> {
        info!(
            "Collecting collect-versions retries for {} (step '{target_step}')",
            self.settings.repository
        );

        let runs = self.matching_runs(window).await?;
        let progress = RunProgress::new(runs.len(), self.settings.show_progress);
        let mut processed_jobs = 0;
        let mut findings = Vec::new();

        for run in &runs {
            progress.advance();

            let Some(job) = self.representative_job(run, window).await? else {
                continue;
            };

            let executed = job
                .steps
                .iter()
                .any(|step| step.name == target_step && step.was_executed());
            if !executed {
                continue;
            }
            processed_jobs += 1;

            let log = match self.client.fetch_job_log(job.id).await {
                Ok(log) => log,
                Err(err) => {
                    warn!("Log download failed for job {}: {err}", job.id);
                    progress.println(format!(
                        "Failed to download logs for run {}: {err}",
                        run.id
                    ));
                    continue;
                }
            };

            match retries::scan_log(&log) {
                Some(scan) if scan.has_retries() => findings.push(RetryFinding {
                    run_id: run.id,
                    job_id: job.id,
                    url: links::run_url(&self.settings.web_url, &self.settings.repository, run.id),
                    scan,
                }),
                Some(_) => {}
                None => progress.println(format!(
                    "Run ID {}, Job ID {}: Could not find log section between markers",
                    run.id, job.id
                )),
            }
        }

        progress.finish();

        Ok(RetryReport {
            repository: self.settings.repository.to_string(),
            collected_at: Utc::now(),
            window: *window,
            target_step: target_step.to_string(),
            processed_jobs,
            findings,
        })
    }
}
