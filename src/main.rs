mod auth;
mod cli;
mod config;
mod error;
mod insights;
mod logs;
mod output;
mod providers;
mod steps;
mod window;

use clap::Parser;
use cli::Cli;
use error::StepLensError;
use log::info;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting StepLens - GitHub Actions step summary");

    if let Err(err) = cli.execute().await {
        match err.downcast_ref::<StepLensError>() {
            Some(classified) => eprintln!("Error: {classified}"),
            None => eprintln!("Unexpected error: {err:#}"),
        }
        std::process::exit(1);
    }
}
