use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::{
    Settings, DEFAULT_API_URL, DEFAULT_LOGS_DIR, DEFAULT_RUN_PREFIX, DEFAULT_WEB_URL,
};
use crate::output::{export_json, print_retry_report, print_status, print_summary};
use crate::providers::GitHubProvider;
use crate::steps::{StepCatalog, DEFAULT_STEPS_FILE};
use crate::window::TimeWindow;

const DEFAULT_RETRY_STEP: &str = "Setup Project Dir";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Report {
    /// Per-step success/failure table
    Steps,
    /// collect-versions retries found in setup logs
    Retries,
}

#[derive(Parser)]
#[command(name = "steplens")]
#[command(author, version, about = "GitHub Actions step outcome summary", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Number of full days before today to analyze, or 0 for today so far
    days: i64,

    /// Disable the progress indicator
    #[arg(long, default_value_t = false)]
    noprogress: bool,

    #[arg(short, long, value_enum, default_value_t = Report::Steps)]
    report: Report,

    /// Step definition file (YAML, JSON or TOML)
    #[arg(long, default_value = DEFAULT_STEPS_FILE)]
    steps_file: PathBuf,

    /// Directory for failure log excerpts, purged on every run that downloads logs
    #[arg(long, default_value = DEFAULT_LOGS_DIR)]
    logs_dir: PathBuf,

    /// Only analyze workflow runs whose name starts with this prefix
    #[arg(long, default_value = DEFAULT_RUN_PREFIX)]
    run_prefix: String,

    /// Also count jobs that were cancelled
    #[arg(long, default_value_t = false)]
    include_cancelled: bool,

    /// Step whose logs are scanned by the retries report
    #[arg(long, default_value = DEFAULT_RETRY_STEP)]
    retry_step: String,

    /// Also write the report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_WEB_URL)]
    web_url: String,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::new(self.token.as_deref(), self.repository.as_deref())?;
        settings.api_url.clone_from(&self.api_url);
        settings.web_url.clone_from(&self.web_url);
        settings.run_prefix.clone_from(&self.run_prefix);
        settings.include_cancelled = self.include_cancelled;
        settings.show_progress = !self.noprogress;
        settings.logs_dir.clone_from(&self.logs_dir);
        Ok(settings)
    }

    fn write_output(&self, report: &impl Serialize) -> Result<()> {
        if let Some(output_path) = &self.output {
            let mut writer = BufWriter::new(File::create(output_path)?);
            export_json(report, self.pretty, &mut writer)?;
            info!("Report written to: {}", output_path.display());
        }
        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let settings = self.settings()?;
        let window = TimeWindow::for_days(self.days)?;
        info!("Analyzing {} for {} day(s)", settings.repository, self.days);

        let provider = GitHubProvider::new(settings)?;

        match self.report {
            Report::Steps => {
                let catalog = StepCatalog::load(&self.steps_file);
                print_status(format!(
                    "Loaded {} steps from {}",
                    catalog.len(),
                    self.steps_file.display()
                ));
                if catalog.is_empty() {
                    print_status("No steps configured, the summary table will be empty");
                }

                let report = provider.collect_step_stats(&catalog, &window).await?;
                print_summary(&report);
                self.write_output(&report)?;
            }
            Report::Retries => {
                let report = provider.collect_retries(&window, &self.retry_step).await?;
                print_retry_report(&report);
                self.write_output(&report)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["steplens"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parses_days_and_noprogress() {
        let cli = parse(&["7", "--noprogress", "--token", "t", "--repository", "o/r"]);

        assert_eq!(cli.days, 7);
        assert!(cli.noprogress);
        assert_eq!(cli.report, Report::Steps);
        assert_eq!(cli.steps_file, PathBuf::from("list_of_steps.yaml"));

        let settings = cli.settings().unwrap();
        assert!(!settings.show_progress);
        assert_eq!(settings.repository.to_string(), "o/r");
    }

    #[test]
    fn test_accepts_negative_days() {
        let cli = parse(&["-3"]);
        assert_eq!(cli.days, -3);
    }

    #[test]
    fn test_retries_report_and_overrides() {
        let cli = parse(&[
            "0",
            "--report",
            "retries",
            "--retry-step",
            "Prepare",
            "--run-prefix",
            "Nightly",
            "--include-cancelled",
            "--token",
            "t",
            "--repository",
            "o/r",
        ]);

        assert_eq!(cli.report, Report::Retries);
        assert_eq!(cli.retry_step, "Prepare");

        let settings = cli.settings().unwrap();
        assert_eq!(settings.run_prefix, "Nightly");
        assert!(settings.include_cancelled);
    }

    #[tokio::test]
    async fn test_out_of_range_days_fail_before_any_request() {
        let cli = parse(&[
            "9223372036854775807",
            "--token",
            "t",
            "--repository",
            "o/r",
            "--api-url",
            "http://127.0.0.1:9",
        ]);

        let err = cli.execute().await.unwrap_err();
        let classified = err.downcast_ref::<crate::error::StepLensError>();
        assert!(
            matches!(classified, Some(crate::error::StepLensError::Config(_))),
            "{err:#}"
        );
    }

    #[test]
    fn test_days_is_required() {
        assert!(Cli::try_parse_from(["steplens"]).is_err());
        assert!(Cli::try_parse_from(["steplens", "seven"]).is_err());
    }
}
