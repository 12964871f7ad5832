//! Directory-backed collection store.
//!
//! Layout of a store directory:
//!
//! ```text
//! <store>/
//! ├─ LOCK                  # Advisory lock for single-writer
//! ├─ collections.json      # Index: id -> name, digest, length
//! └─ manifests/
//!    └─ <sha256>.txt       # Content-addressed manifest text
//! ```
//!
//! Identical manifest texts are stored once. The index is rewritten with a
//! write-then-rename so a crash leaves either the old or the new index.

use crate::error::{StoreError, StoreResult};
use crate::id::CollectionId;
use crate::store::{content_digest, sort_infos, CollectionInfo, CollectionStore};
use fs2::FileExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const LOCK_FILE: &str = "LOCK";
const INDEX_FILE: &str = "collections.json";
const INDEX_TEMP: &str = "collections.json.tmp";
const MANIFESTS_DIR: &str = "manifests";

/// A collection store kept in a directory on disk.
///
/// # Thread Safety
///
/// The store holds an exclusive advisory lock on its directory for as long as
/// it is open. Within the process, the index is guarded by a mutex, so the
/// store can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use collate_store::{CollectionStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new(".collate"), true).unwrap();
/// let id = store.create_collection("demo", ". d41d8cd98f00b204e9800998ecf8427e+0 0:0:x\n").unwrap();
/// println!("created {id}");
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    index: Mutex<BTreeMap<CollectionId, CollectionInfo>>,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - Another process holds the lock (returns [`StoreError::Locked`])
    /// - The index cannot be read or decoded
    pub fn open(path: &Path, create_if_missing: bool) -> StoreResult<Self> {
        if !path.exists() {
            if create_if_missing {
                fs::create_dir_all(path)?;
            } else {
                return Err(StoreError::Corrupted(format!(
                    "store directory does not exist: {}",
                    path.display()
                )));
            }
        }
        if !path.is_dir() {
            return Err(StoreError::Corrupted(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }
        fs::create_dir_all(path.join(MANIFESTS_DIR))?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked);
        }

        let index = load_index(&path.join(INDEX_FILE))?;
        debug!(path = %path.display(), collections = index.len(), "opened file store");

        Ok(Self {
            path: path.to_path_buf(),
            index: Mutex::new(index),
            _lock_file: lock_file,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn blob_path(&self, digest: &str) -> PathBuf {
        self.path.join(MANIFESTS_DIR).join(format!("{digest}.txt"))
    }

    fn write_blob(&self, digest: &str, manifest_text: &str) -> StoreResult<()> {
        let blob_path = self.blob_path(digest);
        if blob_path.exists() {
            return Ok(());
        }
        let temp_path = blob_path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(manifest_text.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, &blob_path)?;
        sync_dir(&self.path.join(MANIFESTS_DIR))
    }

    fn save_index(&self, index: &BTreeMap<CollectionId, CollectionInfo>) -> StoreResult<()> {
        let entries: Vec<&CollectionInfo> = index.values().collect();
        let data = serde_json::to_vec_pretty(&entries)?;

        let temp_path = self.path.join(INDEX_TEMP);
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, self.path.join(INDEX_FILE))?;
        sync_dir(&self.path)
    }
}

fn load_index(index_path: &Path) -> StoreResult<BTreeMap<CollectionId, CollectionInfo>> {
    if !index_path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read(index_path)?;
    if data.is_empty() {
        return Ok(BTreeMap::new());
    }
    let entries: Vec<CollectionInfo> = serde_json::from_slice(&data)?;
    Ok(entries.into_iter().map(|e| (e.id, e)).collect())
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> StoreResult<()> {
    File::open(path)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> StoreResult<()> {
    Ok(())
}

impl CollectionStore for FileStore {
    fn fetch_manifest(&self, id: &CollectionId) -> StoreResult<String> {
        let digest = self
            .index
            .lock()
            .get(id)
            .map(|info| info.digest.clone())
            .ok_or(StoreError::CollectionNotFound { id: *id })?;

        let text = fs::read_to_string(self.blob_path(&digest))?;
        let actual = content_digest(&text);
        if actual != digest {
            return Err(StoreError::Corrupted(format!(
                "manifest of {id} has digest {actual}, expected {digest}"
            )));
        }
        Ok(text)
    }

    fn create_collection(&self, name: &str, manifest_text: &str) -> StoreResult<CollectionId> {
        let digest = content_digest(manifest_text);
        let mut index = self.index.lock();

        self.write_blob(&digest, manifest_text)?;

        let mut id = CollectionId::new();
        while index.contains_key(&id) {
            id = CollectionId::new();
        }
        index.insert(
            id,
            CollectionInfo {
                id,
                name: name.to_string(),
                digest,
                manifest_len: manifest_text.len() as u64,
            },
        );
        if let Err(e) = self.save_index(&index) {
            index.remove(&id);
            return Err(e);
        }

        debug!(%id, name, "created collection");
        Ok(id)
    }

    fn list_collections(&self) -> StoreResult<Vec<CollectionInfo>> {
        let mut infos: Vec<CollectionInfo> = self.index.lock().values().cloned().collect();
        sort_infos(&mut infos);
        Ok(infos)
    }
}
