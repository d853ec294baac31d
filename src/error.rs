//! Error taxonomy for the analysis pipeline.
//!
//! Ingestion-stage errors ([`Error::OwnerNotFound`], [`Error::Decode`]) are
//! terminal and prevent matching from running at all. Storage failures are
//! surfaced as [`Error::Persistence`] and are not retried here. A run with
//! zero matches is a normal success, never an error.

use thiserror::Error;

/// Failure modes of submission ingestion and analysis.
#[derive(Debug, Error)]
pub enum Error {
    /// The given owner identity does not resolve. Raised before any
    /// persistence happens.
    #[error("owner not found: {0}")]
    OwnerNotFound(String),

    /// A file payload was not valid base64, or its decoded bytes were not
    /// UTF-8 text. The whole batch is rejected; nothing is persisted.
    #[error("failed to decode file '{file}': {reason}")]
    Decode { file: String, reason: String },

    /// A storage read or write failed. Surfaced as-is, not retried.
    #[error("storage failure: {0}")]
    Persistence(#[source] anyhow::Error),

    /// The caller cancelled the operation mid-flight. No partial analysis
    /// result is returned.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
