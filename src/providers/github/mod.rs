mod client;
mod links;
mod provider;
mod step_stats;
mod types;

pub use provider::GitHubProvider;
