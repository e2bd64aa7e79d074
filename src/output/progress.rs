use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_yellow};

/// Per-run progress line, repainted in place on stderr.
pub struct RunProgress {
    pb: ProgressBar,
}

impl RunProgress {
    /// A hidden bar when `visible` is false, so callers never branch on it.
    pub fn new(total: usize, visible: bool) -> Self {
        let pb = if visible {
            let pb = ProgressBar::new(total as u64);
            pb.set_draw_target(ProgressDrawTarget::stderr());
            pb.set_style(
                ProgressStyle::with_template("  {msg} {pos}/{len}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb.set_message(bright_yellow("Analyzing run").to_string());
            pb
        } else {
            ProgressBar::hidden()
        };

        Self { pb }
    }

    pub fn advance(&self) {
        self.pb.inc(1);
    }

    /// Prints a line to stdout without tearing the progress line.
    pub fn println(&self, line: impl AsRef<str>) {
        self.pb.suspend(|| println!("{}", line.as_ref()));
    }

    pub fn finish(&self) {
        if self.pb.is_hidden() {
            return;
        }
        self.pb
            .finish_with_message(bright_green("Analyzed runs ✓").to_string());
    }
}
