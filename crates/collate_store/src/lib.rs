//! # Collate Store
//!
//! Collection storage for collate.
//!
//! The merge engine consumes two capabilities from its surroundings: fetch
//! the manifest of an existing collection, and persist a new manifest as a
//! new collection. This crate defines that seam as the [`CollectionStore`]
//! trait and ships two implementations.
//!
//! ## Design Principles
//!
//! - Stores are opaque text stores: no manifest parsing or validation
//! - Stored manifests are immutable, each create yields a new id
//! - Must be `Send + Sync` so fetches for distinct collections can run in parallel
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and fixtures
//! - [`FileStore`] - Persistent, content-addressed directory store
//!
//! ## Example
//!
//! ```rust
//! use collate_store::{CollectionStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let id = store.create_collection("hello", ". acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:foo\n").unwrap();
//! let text = store.fetch_manifest(&id).unwrap();
//! assert!(text.ends_with("0:0:foo\n"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod id;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use id::{CollectionId, InvalidCollectionId, ScopedId};
pub use memory::InMemoryStore;
pub use store::{content_digest, CollectionInfo, CollectionStore};
