//! Error types for docsieve.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The PDF could not be opened or parsed at all. The collection run
    /// skips the document and keeps going.
    #[error("document unreadable: {document}: {reason}")]
    DocumentUnreadable { document: String, reason: String },

    /// The collection's input descriptor is missing required fields or is
    /// structurally malformed. Fails the collection run.
    #[error("invalid input descriptor at {path}: {reason}")]
    InputDescriptorInvalid { path: PathBuf, reason: String },

    /// The requested collection directory does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
