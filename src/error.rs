use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("GitHub API error: {status}")]
    Upstream { status: StatusCode },

    #[error("request to GitHub failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("repository {repo_id} is already saved")]
    AlreadySaved { repo_id: u64 },

    #[error("saved record {id} not found")]
    SavedNotFound { id: Uuid },
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }
}
