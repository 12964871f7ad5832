//! # Collate Core
//!
//! Combines files and streams selected from existing collections into a
//! new collection manifest.
//!
//! The pipeline runs in four steps:
//! - [`SelectionResolver`] fetches the selected collections and cuts them
//!   into fragments
//! - [`StreamAggregator`] groups fragments by destination stream and
//!   concatenates their block lists
//! - [`BlockIndexRemapper`] rewrites segment block indices into the merged
//!   block lists
//! - [`NameDeduplicator`] suffixes colliding file names per stream
//!
//! [`Combiner`] runs all of them and stores the rendered manifest.
//!
//! ```rust
//! use collate_core::Combiner;
//! use collate_store::{CollectionStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let src = store
//!     .create_collection("src", "./dir1 acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:alice.txt\n")
//!     .unwrap();
//!
//! let merged = Combiner::new(&store)
//!     .merge(&[format!("{src}/dir1/alice.txt"), format!("{src}/dir1/alice.txt")])
//!     .unwrap();
//! let root = merged.stream(".").unwrap();
//! assert!(root.has_file("alice.txt"));
//! assert!(root.has_file("alice(1).txt"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod combine;
mod config;
mod dedup;
mod destination;
mod error;
mod merged;
mod remap;
mod resolver;
mod selector;

pub use aggregate::{DestinationGroup, GroupMember, StreamAggregator};
pub use combine::{merge_fragments, CombineOutcome, Combiner};
pub use config::{MergeConfig, DEFAULT_MAX_SELECTORS};
pub use dedup::{suffixed_name, NameDeduplicator};
pub use destination::{canonical_sub_path, destination_path, normalize_stream_path, stream_path_for};
pub use error::{MergeError, MergeResult};
pub use merged::MergedManifest;
pub use remap::{BlockIndexRemapper, RemappedSegment, RemappedStream};
pub use resolver::{Fragment, FragmentId, SelectionResolver};
pub use selector::Selector;
