//! # Collate Testkit
//!
//! Test utilities for collate.
//!
//! This crate provides:
//! - Fixture collections with well-known ids, and stores seeded with them
//! - Property-based generators for valid manifests using proptest
//! - Golden test utilities for manifest text
//! - Fuzz harnesses for the manifest codec
//!
//! ## Usage
//!
//! ```rust
//! use collate_testkit::prelude::*;
//!
//! with_fixture_store(|store| {
//!     let text = store.fetch_manifest(&MULTILEVEL_COLLECTION).unwrap();
//!     assert!(text.contains("./dir1/subdir"));
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod golden;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use golden::*;
