//! Errors raised while assembling the client, as opposed to `ApiError`,
//! which every service call returns.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("stored value under {key} is malformed: {reason}")]
    Malformed { key: String, reason: String },

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<figment::Error> for ClientError {
    fn from(err: figment::Error) -> Self {
        ClientError::Config(Box::new(err))
    }
}
