//! Collection store trait definition.

use crate::error::StoreResult;
use crate::id::CollectionId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Summary of a stored collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection identifier.
    pub id: CollectionId,
    /// Human-readable name.
    pub name: String,
    /// SHA-256 hex digest of the manifest text.
    pub digest: String,
    /// Length of the manifest text in bytes.
    pub manifest_len: u64,
}

/// Storage for collections, keyed by [`CollectionId`].
///
/// A store is an opaque text store: it does not parse or validate manifest
/// text. Callers hand it already-validated manifests.
///
/// # Invariants
///
/// - `fetch_manifest` returns exactly the text passed to `create_collection`
/// - stored manifests are immutable; `create_collection` always makes a new id
/// - implementations must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing and fixtures
/// - [`super::FileStore`] - For persistent storage in a directory
pub trait CollectionStore: Send + Sync {
    /// Returns the manifest text of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::CollectionNotFound`] if no collection has
    /// this id, or an I/O error from the backing storage.
    fn fetch_manifest(&self, id: &CollectionId) -> StoreResult<String>;

    /// Stores a manifest as a new collection and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    fn create_collection(&self, name: &str, manifest_text: &str) -> StoreResult<CollectionId>;

    /// Lists stored collections ordered by name, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list_collections(&self) -> StoreResult<Vec<CollectionInfo>>;
}

/// Computes the SHA-256 hex digest of manifest text.
#[must_use]
pub fn content_digest(manifest_text: &str) -> String {
    format!("{:x}", Sha256::digest(manifest_text.as_bytes()))
}

pub(crate) fn sort_infos(infos: &mut [CollectionInfo]) {
    infos.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_sha256_hex() {
        assert_eq!(
            content_digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_digest("a").len(), 64);
    }
}
