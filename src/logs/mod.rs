mod excerpt;
pub mod retries;
mod store;

pub use excerpt::extract_excerpt;
pub use store::{ExcerptFile, LogStore};
