//! Error types for the merge engine.

use collate_manifest::ManifestError;
use collate_store::{CollectionId, StoreError};
use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur while combining selections into a new collection.
///
/// Every error aborts the whole merge; nothing is persisted.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A selector is neither a collection reference nor a block locator.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector as supplied.
        selector: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No selectors were supplied.
    #[error("nothing selected")]
    EmptySelection,

    /// More selectors than the configured limit.
    #[error("too many selectors: {count} (limit {max})")]
    TooManySelectors {
        /// Number of selectors supplied.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The collection a selector refers to does not exist.
    #[error("collection {id} not found (selector {selector:?})")]
    CollectionNotFound {
        /// The selector that named the collection.
        selector: String,
        /// The collection that could not be fetched.
        id: CollectionId,
    },

    /// A selector names a path that does not exist in its collection.
    #[error("path {path:?} not found in collection (selector {selector:?})")]
    SelectorNotFound {
        /// The offending selector.
        selector: String,
        /// The path that was looked up.
        path: String,
    },

    /// A fetched manifest could not be parsed.
    #[error("manifest for selector {selector:?} is malformed: {source}")]
    Malformed {
        /// The selector whose collection was being read.
        selector: String,
        /// The parse failure.
        #[source]
        source: ManifestError,
    },

    /// A remapped block index fell outside its merged stream.
    #[error("block index {index} out of range for stream {stream:?} with {len} blocks")]
    RemapInvariantViolation {
        /// Destination stream path.
        stream: String,
        /// The computed block index.
        index: usize,
        /// Length of the merged block list.
        len: usize,
    },

    /// The merged manifest could not be rendered.
    #[error("merged manifest cannot be encoded: {source}")]
    Encode {
        /// The encoder failure.
        #[source]
        source: ManifestError,
    },

    /// The collection store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl MergeError {
    /// Creates an invalid selector error.
    pub fn invalid_selector(selector: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason,
        }
    }

    /// Creates a selector-not-found error.
    pub fn selector_not_found(selector: impl Into<String>, path: impl Into<String>) -> Self {
        Self::SelectorNotFound {
            selector: selector.into(),
            path: path.into(),
        }
    }

    /// Returns true if the error was caused by the caller's input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            MergeError::InvalidSelector { .. }
                | MergeError::EmptySelection
                | MergeError::TooManySelectors { .. }
                | MergeError::CollectionNotFound { .. }
                | MergeError::SelectorNotFound { .. }
                | MergeError::Malformed { .. }
        )
    }

    /// Returns true if the error indicates a defect or an infrastructure
    /// failure rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MergeError::RemapInvariantViolation { .. }
                | MergeError::Encode { .. }
                | MergeError::Store(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(MergeError::EmptySelection.is_user_error());
        assert!(MergeError::selector_not_found("x/y", "y").is_user_error());
        let internal = MergeError::RemapInvariantViolation {
            stream: ".".into(),
            index: 4,
            len: 2,
        };
        assert!(internal.is_internal());
        assert!(!internal.is_user_error());
    }

    #[test]
    fn error_display_names_selector() {
        let err = MergeError::selector_not_found("abc/dir1/foo", "dir1/foo");
        let msg = err.to_string();
        assert!(msg.contains("abc/dir1/foo"));
        assert!(msg.contains("dir1/foo"));
    }
}
