//! Merge selectors.
//!
//! A selector names what to copy into the new collection: a whole
//! collection (`<id>`), a file or sub-stream inside one
//! (`<id>/<path>`), or a single content block (`<hash>+<size>`). An `<id>`
//! is a hyphenated UUID or a cluster-scoped `xxxxx-4zz18-...` id.

use crate::destination::canonical_sub_path;
use crate::error::{MergeError, MergeResult};
use collate_manifest::Locator;
use collate_store::CollectionId;
use std::fmt;
use std::str::FromStr;

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every stream of a collection, each kept at its own path.
    WholeCollection(CollectionId),
    /// A file or an exact sub-stream of a collection. The path is canonical
    /// and never empty.
    SubPath(CollectionId, String),
    /// A single block with no stream context.
    BareLocator(Locator),
}

impl Selector {
    /// Parses a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidSelector`] if the string is neither a
    /// collection reference nor a locator, or if its path escapes the
    /// collection with `..`.
    pub fn parse(raw: &str) -> MergeResult<Self> {
        let trimmed = raw.trim();
        let (head, rest) = match trimmed.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (trimmed, None),
        };

        if let Some(id) = CollectionId::parse(head) {
            let Some(rest) = rest else {
                return Ok(Self::WholeCollection(id));
            };
            let path =
                canonical_sub_path(rest).map_err(|reason| MergeError::invalid_selector(raw, reason))?;
            if path.is_empty() {
                return Ok(Self::WholeCollection(id));
            }
            return Ok(Self::SubPath(id, path));
        }

        if rest.is_none() {
            if let Ok(locator) = Locator::parse(head) {
                return Ok(Self::BareLocator(locator));
            }
        }

        Err(MergeError::invalid_selector(
            raw,
            "expected <id>, <id>/<path> or <hash>+<size>",
        ))
    }

    /// Returns the collection this selector reads from, if any.
    #[must_use]
    pub fn collection_id(&self) -> Option<CollectionId> {
        match self {
            Self::WholeCollection(id) | Self::SubPath(id, _) => Some(*id),
            Self::BareLocator(_) => None,
        }
    }
}

impl FromStr for Selector {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeCollection(id) => write!(f, "{id}"),
            Self::SubPath(id, path) => write!(f, "{id}/{path}"),
            Self::BareLocator(locator) => write!(f, "{locator}"),
        }
    }
}
