//! Merge configuration.

/// Default upper bound on the number of selectors in one merge.
pub const DEFAULT_MAX_SELECTORS: usize = 10_000;

/// Configuration for combining selections into a new collection.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Drop blocks that no selected segment references.
    pub compact_blocks: bool,

    /// Maximum number of selectors accepted in a single merge.
    pub max_selectors: usize,

    /// Name recorded for the new collection. `None` uses a generated name.
    pub collection_name: Option<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            compact_blocks: false,
            max_selectors: DEFAULT_MAX_SELECTORS,
            collection_name: None,
        }
    }
}

impl MergeConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether unreferenced blocks are dropped from each fragment.
    #[must_use]
    pub const fn compact_blocks(mut self, value: bool) -> Self {
        self.compact_blocks = value;
        self
    }

    /// Sets the maximum number of selectors.
    #[must_use]
    pub const fn max_selectors(mut self, max: usize) -> Self {
        self.max_selectors = max;
        self
    }

    /// Sets the name of the new collection.
    #[must_use]
    pub fn collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }

    /// Returns the collection name to use for a merge of `selections` selectors.
    #[must_use]
    pub fn name_for(&self, selections: usize) -> String {
        match &self.collection_name {
            Some(name) => name.clone(),
            None => format!("Combined collection ({selections} selections)"),
        }
    }
}
