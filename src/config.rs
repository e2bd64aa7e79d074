use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::Token;
use crate::error::{Result, StepLensError};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_WEB_URL: &str = "https://github.com";
pub const DEFAULT_RUN_PREFIX: &str = "Building on";
pub const DEFAULT_LOGS_DIR: &str = "failed_step_logs";

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = StepLensError;

    fn from_str(path: &str) -> Result<Self> {
        match path.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(StepLensError::Config(format!(
                "GITHUB_REPOSITORY must be in format 'owner/repo', got '{path}'"
            ))),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything a single invocation needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: Token,
    pub repository: Repository,
    /// REST API root, e.g. `https://api.github.com`.
    pub api_url: String,
    /// Web root used to build links, e.g. `https://github.com`.
    pub web_url: String,
    /// Only runs whose name starts with this prefix are analyzed.
    pub run_prefix: String,
    /// Count jobs that concluded as `cancelled`.
    pub include_cancelled: bool,
    pub show_progress: bool,
    /// Where failure log excerpts are written.
    pub logs_dir: PathBuf,
}

impl Settings {
    /// Builds settings from the credential and repository values, failing
    /// before any network traffic when either is missing.
    pub fn new(token: Option<&str>, repository: Option<&str>) -> Result<Self> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                StepLensError::Config("GITHUB_TOKEN not found in environment variables".into())
            })?;
        let repository = repository
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                StepLensError::Config(
                    "GITHUB_REPOSITORY not found in environment variables".into(),
                )
            })?
            .parse()?;

        Ok(Self {
            token: Token::from(token),
            repository,
            api_url: DEFAULT_API_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            run_prefix: DEFAULT_RUN_PREFIX.to_string(),
            include_cancelled: false,
            show_progress: true,
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
        })
    }
}
