mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::export_json;
pub use progress::RunProgress;
pub use summary::print_summary;
pub use tables::print_retry_report;

use styling::{bright_yellow, dim, magenta_bold};

/// Prints the `StepLens` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔍 StepLens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitHub Actions step outcome summary")
    );
}

/// Prints an informational status line to stderr.
pub fn print_status(message: impl std::fmt::Display) {
    eprintln!("{} {}", bright_yellow("›"), message);
}
