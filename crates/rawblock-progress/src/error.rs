//! Errors for the progress crate.
//!
//! Parsing persisted state never errors; only writing it back can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to serialize learning progress: {0}")]
    Serialize(#[from] serde_json::Error),
}
