//! Property-based test generators using proptest.
//!
//! Every generated manifest is valid: block indices are in range and offsets
//! never exceed their block. Stream paths are unique except in
//! [`split_manifest_strategy`], which repeats them on purpose.

use collate_manifest::{FileSegment, Locator, Manifest, Stream, ROOT_STREAM};
use proptest::prelude::*;

/// Strategy for generating content hashes (32 lowercase hex digits).
pub fn hash_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-f]{32}").expect("Invalid regex")
}

/// Strategy for generating locators, sometimes with hints.
pub fn locator_strategy() -> impl Strategy<Value = Locator> {
    (
        hash_strategy(),
        0u64..4096,
        prop::collection::vec(
            prop::string::string_regex("[A-Z][a-z0-9@]{0,8}").expect("Invalid regex"),
            0..2,
        ),
    )
        .prop_map(|(hash, size, hints)| {
            let locator = Locator::new(hash, size).expect("generated hash is valid");
            hints
                .into_iter()
                .fold(locator, |locator, hint| locator.with_hint(hint))
        })
}

/// Strategy for generating file names, including characters that need
/// escaping.
pub fn file_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::string::string_regex("[a-z][a-z0-9_]{0,6}(\\.[a-z]{1,3})?")
            .expect("Invalid regex"),
        1 => prop::string::string_regex("[a-z][a-z0-9 \\\\:\t]{0,8}").expect("Invalid regex"),
    ]
}

/// Strategy for generating stream paths: `.` or `./a/b`.
pub fn stream_path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(ROOT_STREAM.to_string()),
        3 => prop::collection::vec(
            prop::string::string_regex("[a-z][a-z0-9 _]{0,5}").expect("Invalid regex"),
            1..3,
        )
        .prop_map(|parts| format!("./{}", parts.join("/"))),
    ]
}

/// Strategy for generating the blocks and segments of one stream.
pub fn stream_body_strategy() -> impl Strategy<Value = (Vec<Locator>, Vec<FileSegment>)> {
    prop::collection::vec(locator_strategy(), 1..4).prop_flat_map(|locators| {
        let count = locators.len();
        let segment = (0..count, any::<u64>(), file_name_strategy());
        prop::collection::vec(segment, 1..6).prop_map(move |raw| {
            let segments = raw
                .into_iter()
                .map(|(index, offset, name)| {
                    let block = &locators[index];
                    let offset = if block.size() == 0 {
                        0
                    } else {
                        offset % (block.size() + 1)
                    };
                    FileSegment::spanning(index, offset, block, name)
                })
                .collect();
            (locators.clone(), segments)
        })
    })
}

/// Strategy for generating a valid stream.
pub fn stream_strategy() -> impl Strategy<Value = Stream> {
    (stream_path_strategy(), stream_body_strategy()).prop_map(|(path, (locators, segments))| {
        Stream {
            path,
            locators,
            segments,
        }
    })
}

/// Strategy for generating a manifest with 1 to `max_streams` streams and
/// unique stream paths.
pub fn manifest_strategy(max_streams: usize) -> impl Strategy<Value = Manifest> {
    prop::collection::btree_map(stream_path_strategy(), stream_body_strategy(), 1..=max_streams)
        .prop_map(|streams| {
            Manifest::from_streams(
                streams
                    .into_iter()
                    .map(|(path, (locators, segments))| Stream {
                        path,
                        locators,
                        segments,
                    })
                    .collect(),
            )
        })
}

/// Strategy for generating a manifest together with a copy in which some
/// streams are split across two lines with the same path.
///
/// The head lines keep the manifest's order and the tail lines follow all
/// of them, so repeated paths are not adjacent. Both lines of a split stream
/// carry the full block list, and a file may end up with segments on both.
pub fn split_manifest_strategy(max_streams: usize) -> impl Strategy<Value = (Manifest, Manifest)> {
    manifest_strategy(max_streams)
        .prop_flat_map(|manifest| {
            let cuts: Vec<_> = manifest.streams.iter().map(|s| 0..s.segments.len()).collect();
            (Just(manifest), cuts)
        })
        .prop_map(|(manifest, cuts)| {
            let mut heads = Vec::with_capacity(manifest.streams.len());
            let mut tails = Vec::new();
            for (stream, cut) in manifest.streams.iter().zip(cuts) {
                if cut == 0 {
                    heads.push(stream.clone());
                    continue;
                }
                let (head, tail) = stream.segments.split_at(cut);
                heads.push(Stream {
                    segments: head.to_vec(),
                    ..stream.clone()
                });
                tails.push(Stream {
                    segments: tail.to_vec(),
                    ..stream.clone()
                });
            }
            heads.extend(tails);
            (manifest, Manifest::from_streams(heads))
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
