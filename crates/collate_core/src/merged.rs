//! The result of a merge.

use crate::error::{MergeError, MergeResult};
use collate_manifest::{to_manifest_text, Manifest, Stream};
use std::collections::BTreeMap;

/// Finished streams keyed by path. Iteration order is the canonical
/// manifest order, with `.` first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedManifest {
    streams: BTreeMap<String, Stream>,
}

impl MergedManifest {
    /// Creates an empty merged manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished stream, replacing any stream with the same path.
    pub fn insert(&mut self, stream: Stream) {
        self.streams.insert(stream.path.clone(), stream);
    }

    /// Looks up a stream by path.
    #[must_use]
    pub fn stream(&self, path: &str) -> Option<&Stream> {
        self.streams.get(path)
    }

    /// Iterates over streams in path order.
    pub fn streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams.values()
    }

    /// Number of streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns true if nothing was merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Number of distinct files across all streams.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.streams.values().map(|s| s.files().len()).sum()
    }

    /// Renders canonical manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Encode`] if a stream cannot be encoded.
    pub fn to_text(&self) -> MergeResult<String> {
        to_manifest_text(self.streams.values()).map_err(|source| MergeError::Encode { source })
    }

    /// Converts into a plain [`Manifest`] with streams in path order.
    #[must_use]
    pub fn into_manifest(self) -> Manifest {
        Manifest::from_streams(self.streams.into_values().collect())
    }
}
