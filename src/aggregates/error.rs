use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read aggregate file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    // A whole-document file that is not JSON at all. Bad individual records are skipped instead.
    #[error("Failed to parse JSON document '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    // Covers errors joining the blocking load task
    #[error("Background load task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
