use crate::config::Repository;

/// Builds a clickable link to a workflow run.
///
/// # Returns
///
/// e.g. <https://github.com/owner/repo/actions/runs/123>
pub fn run_url(web_url: &str, repository: &Repository, run_id: u64) -> String {
    format!(
        "{}/{}/{}/actions/runs/{run_id}",
        web_url.trim_end_matches('/'),
        repository.owner,
        repository.name
    )
}

/// Builds a link that opens a job log scrolled to a given step.
///
/// # Returns
///
/// e.g. <https://github.com/owner/repo/actions/runs/123/job/456#step:4:1>
pub fn step_url(
    web_url: &str,
    repository: &Repository,
    run_id: u64,
    job_id: u64,
    step_number: u32,
) -> String {
    format!(
        "{}/job/{job_id}#step:{step_number}:1",
        run_url(web_url, repository, run_id)
    )
}
