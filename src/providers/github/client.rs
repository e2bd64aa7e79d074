use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::config::Repository;
use crate::error::{Result, StepLensError};
use crate::window::TimeWindow;

use super::types::{GitHubJob, GitHubWorkflowRun, WorkflowJobsResponse, WorkflowRunsResponse};

pub(super) const PAGE_SIZE: usize = 100;

/// GitHub REST API client for workflow data.
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    repository: Repository,
    token: Token,
}

impl GitHubClient {
    /// Creates a client rooted at `api_url` (e.g. `https://api.github.com`).
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built or
    /// the API URL is invalid.
    pub fn new(api_url: &str, repository: Repository, token: Token) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .user_agent(concat!("steplens/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| StepLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Url::join replaces the last path segment unless the base ends in '/'
        let mut base = api_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_url = Url::parse(&base)
            .map_err(|e| StepLensError::Config(format!("Invalid API URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            repository,
            token,
        })
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.token.as_str())
    }

    fn repo_url(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(&format!(
                "repos/{}/{}/{path}",
                self.repository.owner, self.repository.name
            ))
            .map_err(|e| StepLensError::Config(format!("Invalid repository URL: {e}")))
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Response> {
        debug!("GET {url} {query:?}");
        let response = self
            .auth_request(self.client.get(url).query(query))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Err(StepLensError::from_status(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let body = self.get(url, query).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches every completed workflow run created inside `window`,
    /// following pagination until a short page comes back.
    pub async fn fetch_workflow_runs(&self, window: &TimeWindow) -> Result<Vec<GitHubWorkflowRun>> {
        let url = self.repo_url("actions/runs")?;
        let created = window.created_qualifier();
        let mut all_runs = Vec::new();
        let mut page = 1;

        loop {
            let query = [
                ("status", "completed".to_string()),
                ("created", created.clone()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];

            let response: WorkflowRunsResponse = self.get_json(url.clone(), &query).await?;
            let page_len = response.workflow_runs.len();
            debug!("Page {page}: {page_len} workflow runs");

            all_runs.extend(response.workflow_runs);

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all_runs)
    }

    /// Fetches the jobs of a workflow run, in provider order.
    pub async fn fetch_jobs_for_run(&self, run_id: u64) -> Result<Vec<GitHubJob>> {
        let url = self.repo_url(&format!("actions/runs/{run_id}/jobs"))?;
        let query = [("per_page", PAGE_SIZE.to_string())];

        let response: WorkflowJobsResponse = self.get_json(url, &query).await?;
        Ok(response.jobs)
    }

    /// Downloads the full plain-text log of a job.
    pub async fn fetch_job_log(&self, job_id: u64) -> Result<String> {
        let url = self.repo_url(&format!("actions/jobs/{job_id}/logs"))?;
        Ok(self.get(url, &[]).await?.text().await?)
    }
}
