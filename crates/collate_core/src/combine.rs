//! The combine pipeline: selectors in, new collection out.

use crate::aggregate::StreamAggregator;
use crate::config::MergeConfig;
use crate::dedup::NameDeduplicator;
use crate::error::{MergeError, MergeResult};
use crate::merged::MergedManifest;
use crate::remap::BlockIndexRemapper;
use crate::resolver::{Fragment, SelectionResolver};
use crate::selector::Selector;
use collate_store::{CollectionId, CollectionStore};
use tracing::{debug, info};

/// Result of a successful combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOutcome {
    /// Identifier of the new collection.
    pub collection_id: CollectionId,
    /// Name it was stored under.
    pub name: String,
    /// The stored manifest text.
    pub manifest_text: String,
    /// Number of streams in the new collection.
    pub streams: usize,
    /// Number of distinct files in the new collection.
    pub files: usize,
}

/// Combines selected files and streams from existing collections into a
/// new collection.
///
/// # Example
///
/// ```rust
/// use collate_core::{Combiner, MergeConfig};
/// use collate_store::{CollectionStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// let a = store
///     .create_collection("a", ". acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:foo\n")
///     .unwrap();
/// let b = store
///     .create_collection("b", ". 37b51d194a7513e45b56f6524f2d51f2+3 0:0:foo\n")
///     .unwrap();
///
/// let combiner = Combiner::with_config(&store, MergeConfig::new().collection_name("both"));
/// let outcome = combiner.combine(&[a.to_string(), b.to_string()]).unwrap();
/// assert!(outcome.manifest_text.contains("0:0:foo 1:0:foo(1)"));
/// assert_eq!(outcome.name, "both");
/// ```
pub struct Combiner<'a> {
    store: &'a dyn CollectionStore,
    config: MergeConfig,
}

impl<'a> Combiner<'a> {
    /// Creates a combiner with the default configuration.
    pub fn new(store: &'a dyn CollectionStore) -> Self {
        Self::with_config(store, MergeConfig::default())
    }

    /// Creates a combiner with a custom configuration.
    pub fn with_config(store: &'a dyn CollectionStore, config: MergeConfig) -> Self {
        Self { store, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Parses selector strings, enforcing the configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::EmptySelection`], [`MergeError::TooManySelectors`]
    /// or the first [`MergeError::InvalidSelector`].
    pub fn parse_selectors<S: AsRef<str>>(&self, raw: &[S]) -> MergeResult<Vec<Selector>> {
        if raw.is_empty() {
            return Err(MergeError::EmptySelection);
        }
        if raw.len() > self.config.max_selectors {
            return Err(MergeError::TooManySelectors {
                count: raw.len(),
                max: self.config.max_selectors,
            });
        }
        raw.iter().map(|s| Selector::parse(s.as_ref())).collect()
    }

    /// Merges already parsed selectors without storing anything.
    ///
    /// # Errors
    ///
    /// Returns any resolution or remapping error.
    pub fn merge_selectors(&self, selectors: &[Selector]) -> MergeResult<MergedManifest> {
        let fragments = SelectionResolver::new(self.store)
            .compact_blocks(self.config.compact_blocks)
            .resolve(selectors)?;
        merge_fragments(fragments)
    }

    /// Parses and merges selector strings without storing anything.
    ///
    /// # Errors
    ///
    /// Returns any parse, resolution or remapping error.
    pub fn merge<S: AsRef<str>>(&self, selectors: &[S]) -> MergeResult<MergedManifest> {
        let parsed = self.parse_selectors(selectors)?;
        self.merge_selectors(&parsed)
    }

    /// Merges the selections and stores the result as a new collection.
    ///
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first error from parsing, resolution, remapping,
    /// encoding or the store.
    #[tracing::instrument(skip(self, selectors), fields(selectors = selectors.len()))]
    pub fn combine<S: AsRef<str>>(&self, selectors: &[S]) -> MergeResult<CombineOutcome> {
        let merged = self.merge(selectors)?;
        let manifest_text = merged.to_text()?;
        let name = self.config.name_for(selectors.len());
        let collection_id = self.store.create_collection(&name, &manifest_text)?;

        let outcome = CombineOutcome {
            collection_id,
            name,
            streams: merged.len(),
            files: merged.file_count(),
            manifest_text,
        };
        info!(
            collection = %outcome.collection_id,
            streams = outcome.streams,
            files = outcome.files,
            "Combined collection created"
        );
        Ok(outcome)
    }
}

/// Runs aggregation, remapping and deduplication over resolved fragments.
///
/// # Errors
///
/// Returns [`MergeError::RemapInvariantViolation`] if a fragment references
/// blocks it does not carry.
pub fn merge_fragments(fragments: Vec<Fragment>) -> MergeResult<MergedManifest> {
    let mut merged = MergedManifest::new();
    for (path, group) in StreamAggregator::aggregate(fragments) {
        let remapped = BlockIndexRemapper::remap(group)?;
        let stream = NameDeduplicator::deduplicate(remapped);
        debug!(
            stream = %path,
            blocks = stream.locators.len(),
            segments = stream.segments.len(),
            "Merged stream"
        );
        merged.insert(stream);
    }
    Ok(merged)
}
