//! Error types for the msgstore-export library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting or exporting a datastore.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The datastore file is missing or could not be opened read-only.
    ///
    /// Raised before any extraction attempt; retrying with a different path
    /// is up to the caller.
    #[error("cannot open datastore {path}: {reason}")]
    Open {
        /// Path that was attempted
        path: PathBuf,
        /// Why the open failed
        reason: String,
    },

    /// A query failed against an already-opened connection, e.g. the
    /// datastore lacks an expected table or column.
    #[error("datastore query failed: {0}")]
    DataAccess(#[from] rusqlite::Error),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization/deserialization errors
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExtractError {
    /// Build an [`ExtractError::Open`] for the given path.
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Result with ExtractError
pub type Result<T> = std::result::Result<T, ExtractError>;
