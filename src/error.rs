//! Error types shared by the domain, the ports and the stage runners.

use thiserror::Error;

/// Boxed error returned by collaborator ports that wrap arbitrary SDK failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A time code or captions block that does not follow its format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("malformed SRT time code: {0:?}")]
    SrtTimeCode(String),

    #[error("malformed ASS time code: {0:?}")]
    AssTimeCode(String),

    #[error("malformed time range: {0:?}")]
    TimeRange(String),
}

/// Failures reported by a [`StoragePort`](crate::ports::storage::StoragePort).
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(#[source] BoxError),
}

/// One chunk whose worker failed inside the coordinator.
#[derive(Error, Debug)]
#[error("chunk {chunk} failed: {source}")]
pub struct ChunkFailure {
    pub chunk: String,
    #[source]
    pub source: BoxError,
}

/// Outcome of a coordinator run where at least one worker failed.
///
/// Both lists are ordered by chunk number, so callers can inspect what
/// completed alongside what did not.
#[derive(Error, Debug)]
#[error("{} of {} chunks failed: {}", .failed.len(), .failed.len() + .completed.len(), chunk_list(.failed))]
pub struct PartialFailure<T: std::fmt::Debug> {
    pub failed: Vec<ChunkFailure>,
    pub completed: Vec<(String, T)>,
}

fn chunk_list(failed: &[ChunkFailure]) -> String {
    failed
        .iter()
        .map(|f| f.chunk.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<T: std::fmt::Debug> PartialFailure<T> {
    pub fn failed_names(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.chunk.clone()).collect()
    }
}

/// Everything that can make a stage's own work fail.
///
/// The runner turns any of these into the stage's `_error` status.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("chunks failed: {}", .failed.join(", "))]
    PartialFailure { failed: Vec<String> },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("external collaborator failed: {0}")]
    External(#[source] BoxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pod: {0}")]
    InvalidPod(String),
}

impl<T: std::fmt::Debug> From<PartialFailure<T>> for StageError {
    fn from(err: PartialFailure<T>) -> Self {
        StageError::PartialFailure {
            failed: err.failed_names(),
        }
    }
}

/// The outbound send of a stage's result failed. Terminal for the invocation.
#[derive(Error, Debug)]
#[error("failed to publish pod {pod} as {message_type}: {source}")]
pub struct PublishError {
    pub pod: String,
    pub message_type: String,
    #[source]
    pub source: BoxError,
}

/// Missing or unparsable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} env var required")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
