use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already watching {0}")]
    AlreadyWatching(String),
    #[error("not watching {0}")]
    NotWatching(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// True for failures of the bridge itself, as opposed to a bad request.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::BackendUnavailable(_) | Error::Timeout(_))
    }
}
