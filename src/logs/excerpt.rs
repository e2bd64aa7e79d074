use thiserror::Error;

/// Line GitHub Actions prints when a step's shell command exits non-zero.
pub const ERROR_MARKER: &str = "##[error]Process completed with exit code 1.";

/// GitHub replaces secrets with this in job logs.
pub const MASK_MARKER: &str = "***";

pub const MAX_EXCERPT_LINES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExcerptMiss {
    #[error("search string not found in log")]
    SearchString,

    #[error("error marker not found after search string")]
    ErrorMarker,
}

fn is_masked(line: &str) -> bool {
    line.contains(MASK_MARKER)
}

/// Extracts the tail of a failing command's output from a raw job log.
///
/// The region of interest starts at the first line containing `search` and
/// ends just before the next [`ERROR_MARKER`] line. At most
/// [`MAX_EXCERPT_LINES`] lines are kept, taken from the end of the region;
/// when the region is shorter, lines preceding it fill the excerpt up.
/// Lines containing [`MASK_MARKER`] are always dropped.
pub fn extract_excerpt<'a>(log: &'a str, search: &str) -> Result<Vec<&'a str>, ExcerptMiss> {
    let lines: Vec<&str> = log.lines().collect();

    let search_index = lines
        .iter()
        .position(|line| line.contains(search))
        .ok_or(ExcerptMiss::SearchString)?;

    let error_index = lines[search_index + 1..]
        .iter()
        .position(|line| line.contains(ERROR_MARKER))
        .map(|offset| search_index + 1 + offset)
        .ok_or(ExcerptMiss::ErrorMarker)?;

    let window_start = search_index.max(error_index.saturating_sub(MAX_EXCERPT_LINES));

    let mut excerpt: Vec<&str> = lines[window_start..error_index]
        .iter()
        .copied()
        .filter(|line| !is_masked(line))
        .collect();

    if excerpt.len() < MAX_EXCERPT_LINES && window_start > 0 {
        let needed = MAX_EXCERPT_LINES - excerpt.len();
        let mut backfill: Vec<&str> = lines[..window_start]
            .iter()
            .rev()
            .copied()
            .filter(|line| !is_masked(line))
            .take(needed)
            .collect();
        backfill.reverse();
        backfill.append(&mut excerpt);
        excerpt = backfill;
    }

    if excerpt.len() > MAX_EXCERPT_LINES {
        excerpt.drain(..excerpt.len() - MAX_EXCERPT_LINES);
    }

    Ok(excerpt)
}
