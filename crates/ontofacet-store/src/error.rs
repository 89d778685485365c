//! Error type for store backends and snapshot loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to fetch snapshot {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no graph snapshot configured")]
    NoSnapshot,

    #[error("term {0:?} is referenced but not defined")]
    UnknownTerm(String),

    #[error("record {0:?} is referenced but not defined")]
    UnknownRecord(String),

    #[error("term {0:?} is defined more than once")]
    DuplicateTerm(String),

    #[error("record {0:?} is defined more than once")]
    DuplicateRecord(String),

    #[error("malformed relation filter {rule}: {reason}")]
    MalformedFilter { rule: String, reason: &'static str },

    #[error("term index: {0}")]
    Index(#[from] fst::Error),

    /// The backend could not be reached or refused the query.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
