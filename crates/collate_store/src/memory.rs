//! In-memory collection store for testing.

use crate::error::{StoreError, StoreResult};
use crate::id::CollectionId;
use crate::store::{content_digest, sort_infos, CollectionInfo, CollectionStore};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Record {
    name: String,
    manifest_text: String,
}

/// An in-memory collection store.
///
/// This store keeps all collections in memory and is suitable for:
/// - Unit tests
/// - Integration tests with fixture collections
/// - One-shot merges that do not need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use collate_store::{CollectionStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// let id = store.create_collection("demo", ". d41d8cd98f00b204e9800998ecf8427e+0 0:0:empty\n").unwrap();
/// assert!(store.fetch_manifest(&id).unwrap().contains("empty"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<CollectionId, Record>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a collection under a caller-chosen id, replacing any previous
    /// collection with that id.
    ///
    /// Useful for fixtures with well-known identifiers.
    pub fn insert_with_id(
        &self,
        id: CollectionId,
        name: impl Into<String>,
        manifest_text: impl Into<String>,
    ) {
        self.records.write().insert(
            id,
            Record {
                name: name.into(),
                manifest_text: manifest_text.into(),
            },
        );
    }

    /// Returns the number of stored collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store holds no collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl CollectionStore for InMemoryStore {
    fn fetch_manifest(&self, id: &CollectionId) -> StoreResult<String> {
        self.records
            .read()
            .get(id)
            .map(|r| r.manifest_text.clone())
            .ok_or(StoreError::CollectionNotFound { id: *id })
    }

    fn create_collection(&self, name: &str, manifest_text: &str) -> StoreResult<CollectionId> {
        let mut records = self.records.write();
        let mut id = CollectionId::new();
        while records.contains_key(&id) {
            id = CollectionId::new();
        }
        records.insert(
            id,
            Record {
                name: name.to_string(),
                manifest_text: manifest_text.to_string(),
            },
        );
        Ok(id)
    }

    fn list_collections(&self) -> StoreResult<Vec<CollectionInfo>> {
        let mut infos: Vec<CollectionInfo> = self
            .records
            .read()
            .iter()
            .map(|(id, r)| CollectionInfo {
                id: *id,
                name: r.name.clone(),
                digest: content_digest(&r.manifest_text),
                manifest_len: r.manifest_text.len() as u64,
            })
            .collect();
        sort_infos(&mut infos);
        Ok(infos)
    }
}
