//! Error types for store operations.

use crate::id::CollectionId;
use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing collections.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No collection with this identifier exists.
    #[error("collection not found: {id}")]
    CollectionNotFound {
        /// The identifier that was looked up.
        id: CollectionId,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store index could not be encoded or decoded.
    #[error("index serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data does not match its recorded digest or is otherwise damaged.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// Another process holds the store lock.
    #[error("store locked: another process has exclusive access")]
    Locked,
}

impl StoreError {
    /// Returns true if this error means the collection does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::CollectionNotFound { .. })
    }
}
