//! Selection resolution: turns selectors into fragments of source streams.

use crate::destination::{destination_path, stream_path_for};
use crate::error::{MergeError, MergeResult};
use crate::selector::Selector;
use collate_manifest::{FileSegment, Locator, Manifest, Stream, ROOT_STREAM};
use collate_store::{CollectionId, CollectionStore};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Identifies a fragment within one merge. Assigned in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentId(pub usize);

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fragment:{}", self.0)
    }
}

/// A piece of one source stream selected for the merge.
///
/// `segments` still carry block indices into `locators`, the source
/// stream's own block list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Fragment identity, used to tell distinct files apart.
    pub id: FragmentId,
    /// Position of the originating selector in the selector list.
    pub selector_index: usize,
    /// Path of the stream the fragment was read from.
    pub source_path: String,
    /// Path of the stream the fragment is written to.
    pub destination: String,
    /// The source stream's block list.
    pub locators: Vec<Locator>,
    /// Selected segments, indexed into `locators`.
    pub segments: Vec<FileSegment>,
}

/// Resolves selectors against a collection store.
///
/// Each distinct collection is fetched and parsed at most once per resolver.
pub struct SelectionResolver<'a> {
    store: &'a dyn CollectionStore,
    compact_blocks: bool,
    cache: HashMap<CollectionId, Arc<Manifest>>,
}

impl<'a> SelectionResolver<'a> {
    /// Creates a resolver reading from `store`.
    pub fn new(store: &'a dyn CollectionStore) -> Self {
        Self {
            store,
            compact_blocks: false,
            cache: HashMap::new(),
        }
    }

    /// Sets whether each fragment keeps only the blocks its segments use.
    #[must_use]
    pub fn compact_blocks(mut self, value: bool) -> Self {
        self.compact_blocks = value;
        self
    }

    /// Resolves `selectors` into fragments, preserving selector order.
    ///
    /// A whole-collection selector yields one fragment per stream path, in
    /// order of first appearance. Lines repeating a stream path are read as
    /// one stream, so a file split across them stays one file.
    ///
    /// # Errors
    ///
    /// - [`MergeError::CollectionNotFound`] if a collection does not exist
    /// - [`MergeError::SelectorNotFound`] if a path does not exist in its collection
    /// - [`MergeError::Malformed`] if a fetched manifest cannot be parsed
    /// - [`MergeError::Store`] for any other store failure
    pub fn resolve(&mut self, selectors: &[Selector]) -> MergeResult<Vec<Fragment>> {
        let mut fragments = Vec::new();
        for (selector_index, selector) in selectors.iter().enumerate() {
            match selector {
                Selector::WholeCollection(id) => {
                    let manifest = self.manifest(selector, *id)?;
                    for stream in &manifest.streams {
                        fragments.push(self.fragment(
                            fragments.len(),
                            selector_index,
                            selector,
                            stream,
                            stream.segments.clone(),
                        ));
                    }
                }
                Selector::SubPath(id, path) => {
                    let manifest = self.manifest(selector, *id)?;
                    let (stream, segments) = find_sub_path(&manifest, selector, path)?;
                    fragments.push(self.fragment(
                        fragments.len(),
                        selector_index,
                        selector,
                        stream,
                        segments,
                    ));
                }
                Selector::BareLocator(locator) => {
                    let mut stream = Stream::new(ROOT_STREAM);
                    stream.locators.push(locator.clone());
                    let segment = FileSegment::spanning(0, 0, locator, locator.to_string());
                    fragments.push(self.fragment(
                        fragments.len(),
                        selector_index,
                        selector,
                        &stream,
                        vec![segment],
                    ));
                }
            }
        }
        Ok(fragments)
    }

    fn fragment(
        &self,
        id: usize,
        selector_index: usize,
        selector: &Selector,
        stream: &Stream,
        mut segments: Vec<FileSegment>,
    ) -> Fragment {
        let locators = if self.compact_blocks {
            compact(&stream.locators, &mut segments)
        } else {
            stream.locators.clone()
        };
        let fragment = Fragment {
            id: FragmentId(id),
            selector_index,
            source_path: stream.path.clone(),
            destination: destination_path(selector, &stream.path),
            locators,
            segments,
        };
        debug!(
            fragment = %fragment.id,
            selector = %selector,
            source = %fragment.source_path,
            destination = %fragment.destination,
            blocks = fragment.locators.len(),
            segments = fragment.segments.len(),
            "Resolved fragment"
        );
        fragment
    }

    fn manifest(&mut self, selector: &Selector, id: CollectionId) -> MergeResult<Arc<Manifest>> {
        if let Some(manifest) = self.cache.get(&id) {
            return Ok(Arc::clone(manifest));
        }
        let text = self.store.fetch_manifest(&id).map_err(|e| {
            if e.is_not_found() {
                MergeError::CollectionNotFound {
                    selector: selector.to_string(),
                    id,
                }
            } else {
                MergeError::Store(e)
            }
        })?;
        let manifest = Manifest::parse(&text).map_err(|source| MergeError::Malformed {
            selector: selector.to_string(),
            source,
        })?;
        let manifest = Arc::new(manifest.coalesced());
        self.cache.insert(id, Arc::clone(&manifest));
        Ok(manifest)
    }
}

/// Finds what an `id/path` selector names: an exact stream first, then a
/// file inside the stream named by the path's parent.
fn find_sub_path<'m>(
    manifest: &'m Manifest,
    selector: &Selector,
    path: &str,
) -> MergeResult<(&'m Stream, Vec<FileSegment>)> {
    if let Some(stream) = manifest.stream(&stream_path_for(path)) {
        return Ok((stream, stream.segments.clone()));
    }

    let (dir, name) = path.rsplit_once('/').unwrap_or(("", path));
    manifest
        .stream(&stream_path_for(dir))
        .map(|stream| (stream, stream.segments_named(name).cloned().collect::<Vec<_>>()))
        .filter(|(_, segments)| !segments.is_empty())
        .ok_or_else(|| MergeError::selector_not_found(selector.to_string(), path))
}

/// Keeps only the blocks `segments` reference, in their original order, and
/// renumbers the segments to match.
fn compact(locators: &[Locator], segments: &mut [FileSegment]) -> Vec<Locator> {
    let mut used = vec![false; locators.len()];
    for segment in segments.iter() {
        if let Some(flag) = used.get_mut(segment.block_index) {
            *flag = true;
        }
    }

    let mut renumbered = vec![0; locators.len()];
    let mut kept = Vec::new();
    for (index, (locator, used)) in locators.iter().zip(used).enumerate() {
        if used {
            renumbered[index] = kept.len();
            kept.push(locator.clone());
        }
    }

    for segment in segments.iter_mut() {
        if let Some(&index) = renumbered.get(segment.block_index) {
            segment.block_index = index;
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use collate_store::{CollectionInfo, InMemoryStore, StoreError, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HASH_A: &str = "acbd18db4cc2f85cedef654fccc4a4d8";
    const HASH_B: &str = "37b51d194a7513e45b56f6524f2d51f2";

    fn store_with(text: &str) -> (InMemoryStore, CollectionId) {
        let store = InMemoryStore::new();
        let id = store.create_collection("test", text).unwrap();
        (store, id)
    }

    #[test]
    fn whole_collection_yields_every_stream() {
        let (store, id) = store_with(&format!(
            ". {HASH_A}+3 0:0:foo\n./dir1 {HASH_B}+3 0:0:bar\n"
        ));
        let mut resolver = SelectionResolver::new(&store);
        let fragments = resolver
            .resolve(&[Selector::WholeCollection(id)])
            .unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].destination, ".");
        assert_eq!(fragments[1].destination, "./dir1");
        assert_eq!(fragments[1].source_path, "./dir1");
        assert_eq!(fragments[1].id, FragmentId(1));
    }

    #[test]
    fn sub_path_selects_single_file() {
        let (store, id) = store_with(&format!(
            "./dir1 {HASH_A}+3 {HASH_B}+3 0:0:foo 1:0:bar\n"
        ));
        let mut resolver = SelectionResolver::new(&store);
        let fragments = resolver
            .resolve(&[Selector::SubPath(id, "dir1/bar".into())])
            .unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].destination, ".");
        assert_eq!(fragments[0].segments.len(), 1);
        assert_eq!(fragments[0].segments[0].name, "bar");
        assert_eq!(fragments[0].segments[0].block_index, 1);
        assert_eq!(fragments[0].locators.len(), 2);
    }

    #[test]
    fn sub_path_prefers_stream_over_file() {
        let (store, id) = store_with(&format!(
            ". {HASH_A}+3 0:0:dir1\n./dir1 {HASH_B}+3 0:0:inner\n"
        ));
        let mut resolver = SelectionResolver::new(&store);
        let fragments = resolver
            .resolve(&[Selector::SubPath(id, "dir1".into())])
            .unwrap();
        assert_eq!(fragments[0].source_path, "./dir1");
        assert_eq!(fragments[0].segments[0].name, "inner");
    }

    #[test]
    fn missing_path_is_selector_not_found() {
        let (store, id) = store_with(&format!(". {HASH_A}+3 0:0:foo\n"));
        let mut resolver = SelectionResolver::new(&store);
        let err = resolver
            .resolve(&[Selector::SubPath(id, "nope/foo".into())])
            .unwrap_err();
        match err {
            MergeError::SelectorNotFound { path, .. } => assert_eq!(path, "nope/foo"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_collection_is_collection_not_found() {
        let store = InMemoryStore::new();
        let id = CollectionId::new();
        let mut resolver = SelectionResolver::new(&store);
        let err = resolver
            .resolve(&[Selector::WholeCollection(id)])
            .unwrap_err();
        assert!(matches!(err, MergeError::CollectionNotFound { id: missing, .. } if missing == id));
    }

    #[test]
    fn malformed_manifest_names_selector() {
        let (store, id) = store_with(". 0:0:foo\n");
        let mut resolver = SelectionResolver::new(&store);
        let err = resolver
            .resolve(&[Selector::WholeCollection(id)])
            .unwrap_err();
        match err {
            MergeError::Malformed { selector, .. } => assert_eq!(selector, id.to_string()),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn repeated_stream_lines_resolve_as_one_stream() {
        let (store, id) = store_with(&format!(
            "./dir1 {HASH_A}+3 0:0:big\n./dir1 {HASH_B}+3 0:0:big\n"
        ));
        let mut resolver = SelectionResolver::new(&store);

        let whole = resolver.resolve(&[Selector::WholeCollection(id)]).unwrap();
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].locators.len(), 2);
        assert_eq!(whole[0].segments.len(), 2);

        let file = resolver
            .resolve(&[Selector::SubPath(id, "dir1/big".into())])
            .unwrap();
        assert_eq!(
            file[0].segments,
            vec![FileSegment::new(0, 0, 3, "big"), FileSegment::new(1, 0, 3, "big")]
        );

        let stream = resolver
            .resolve(&[Selector::SubPath(id, "dir1".into())])
            .unwrap();
        assert_eq!(stream[0].segments.len(), 2);
        assert_eq!(stream[0].locators[1].hash(), HASH_B);
    }

    #[test]
    fn bare_locator_is_synthesized() {
        let store = InMemoryStore::new();
        let locator = Locator::parse("7a6ef4c162a5c6413070a8bd0bffc818+150").unwrap();
        let mut resolver = SelectionResolver::new(&store);
        let fragments = resolver
            .resolve(&[Selector::BareLocator(locator.clone())])
            .unwrap();
        let fragment = &fragments[0];
        assert_eq!(fragment.destination, ".");
        assert_eq!(fragment.locators, vec![locator]);
        assert_eq!(
            fragment.segments,
            vec![FileSegment::new(0, 0, 150, "7a6ef4c162a5c6413070a8bd0bffc818+150")]
        );
    }

    #[test]
    fn compaction_drops_unused_blocks() {
        let (store, id) = store_with(&format!(
            "./dir1 {HASH_A}+3 {HASH_B}+3 0:0:foo 1:0:bar\n"
        ));
        let mut resolver = SelectionResolver::new(&store).compact_blocks(true);
        let fragments = resolver
            .resolve(&[Selector::SubPath(id, "dir1/bar".into())])
            .unwrap();
        assert_eq!(fragments[0].locators.len(), 1);
        assert_eq!(fragments[0].locators[0].hash(), HASH_B);
        assert_eq!(fragments[0].segments[0].block_index, 0);
    }

    struct CountingStore {
        inner: InMemoryStore,
        fetches: AtomicUsize,
    }

    impl CollectionStore for CountingStore {
        fn fetch_manifest(&self, id: &CollectionId) -> StoreResult<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_manifest(id)
        }

        fn create_collection(&self, name: &str, manifest_text: &str) -> StoreResult<CollectionId> {
            self.inner.create_collection(name, manifest_text)
        }

        fn list_collections(&self) -> StoreResult<Vec<CollectionInfo>> {
            Err(StoreError::Corrupted("not listed".into()))
        }
    }

    #[test]
    fn each_collection_fetched_once() {
        let (inner, id) = store_with(&format!(". {HASH_A}+3 0:0:foo 0:0:bar\n"));
        let store = CountingStore {
            inner,
            fetches: AtomicUsize::new(0),
        };
        let mut resolver = SelectionResolver::new(&store);
        resolver
            .resolve(&[
                Selector::SubPath(id, "foo".into()),
                Selector::SubPath(id, "bar".into()),
                Selector::WholeCollection(id),
            ])
            .unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }
}
