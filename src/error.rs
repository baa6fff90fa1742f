use std::path::PathBuf;
use thiserror::Error;

/// Failure while writing the backing file. Reads never fail; they degrade
/// to an empty or partial catalog instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode catalog as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not encode catalog as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Movie '{0}' already exists!")]
    AlreadyExists(String),
    #[error("Movie '{0}' doesn't exist!")]
    NotFound(String),
    #[error("Movie name cannot be empty.")]
    EmptyTitle,
    #[error("Rating {0} is out of range, expected a value between 0 and 10.")]
    InvalidRating(f64),
    #[error("Could not save the catalog: {0}")]
    Storage(#[from] StorageError),
}

/// Failure of an external metadata lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Movie '{0}' was not found")]
    NotFound(String),
    #[error("Request error occurred: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Error parsing response: {0}")]
    Decode(String),
}
