use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::Result;

/// A log excerpt ready to be written to disk.
pub struct ExcerptFile<'a> {
    pub step_name: &'a str,
    pub run_id: u64,
    pub job_id: u64,
    pub search_string: &'a str,
    pub downloaded_at: DateTime<Utc>,
    pub lines: &'a [&'a str],
}

impl ExcerptFile<'_> {
    /// `<step>_run<run>_job<job>_<timestamp>.log`, with spaces and slashes
    /// in the step name replaced by underscores.
    pub fn file_name(&self) -> String {
        self.candidate_name(1)
    }

    /// Name for the `attempt`-th try; later attempts get a `_<n>` suffix.
    fn candidate_name(&self, attempt: u32) -> String {
        let stem = format!(
            "{}_run{}_job{}_{}",
            sanitize_step_name(self.step_name),
            self.run_id,
            self.job_id,
            self.downloaded_at.format("%Y%m%d_%H%M%S")
        );
        if attempt == 1 {
            format!("{stem}.log")
        } else {
            format!("{stem}_{attempt}.log")
        }
    }

    fn render(&self) -> String {
        let mut contents = String::new();
        let _ = writeln!(contents, "Step: {}", self.step_name);
        let _ = writeln!(contents, "Run ID: {}", self.run_id);
        let _ = writeln!(contents, "Job ID: {}", self.job_id);
        let _ = writeln!(contents, "Search string: {}", self.search_string);
        let _ = writeln!(
            contents,
            "Downloaded at: {}",
            self.downloaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(contents, "Lines: {}", self.lines.len());
        let _ = writeln!(contents, "{}", "=".repeat(80));
        for line in self.lines {
            let _ = writeln!(contents, "{line}");
        }
        contents
    }
}

fn sanitize_step_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// Directory that receives failure log excerpts.
pub struct LogStore {
    dir: PathBuf,
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Removes anything left over from a previous invocation and recreates
    /// the directory.
    pub fn reset(&self) -> Result<()> {
        if self.dir.exists() {
            debug!("Purging log directory {}", self.dir.display());
            fs::remove_dir_all(&self.dir)?;
        }
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Writes the excerpt to a fresh file. An existing file with the same
    /// name is never overwritten.
    pub fn write(&self, excerpt: &ExcerptFile<'_>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let contents = excerpt.render();

        let mut attempt = 1;
        loop {
            let path = self.dir.join(excerpt.candidate_name(attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(contents.as_bytes())?;
                    return Ok(path);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
