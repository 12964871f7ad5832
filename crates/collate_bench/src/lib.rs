//! Benchmark utilities: synthetic manifests of configurable shape.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use collate_manifest::{FileSegment, Locator, Manifest, Stream};
use collate_store::{CollectionId, CollectionStore, InMemoryStore};
use rand::Rng;

/// Generates a random locator with a block size below 64 MiB.
pub fn random_locator(rng: &mut impl Rng) -> Locator {
    let hash = format!("{:032x}", rng.gen::<u128>());
    Locator::new(hash, rng.gen_range(1..64 * 1024 * 1024))
        .expect("32 hex digits form a valid hash")
}

/// Generates a manifest with `streams` streams of `blocks` blocks and
/// `files` files each. File names repeat across streams and collections.
pub fn generate_manifest(streams: usize, blocks: usize, files: usize) -> Manifest {
    let mut rng = rand::thread_rng();
    let streams = (0..streams)
        .map(|s| {
            let path = if s == 0 {
                ".".to_string()
            } else {
                format!("./dir{s}")
            };
            let locators: Vec<Locator> = (0..blocks).map(|_| random_locator(&mut rng)).collect();
            let segments = (0..files)
                .map(|f| {
                    let index = rng.gen_range(0..locators.len());
                    let offset = rng.gen_range(0..=locators[index].size());
                    FileSegment::spanning(index, offset, &locators[index], format!("file{f}.dat"))
                })
                .collect();
            Stream {
                path,
                locators,
                segments,
            }
        })
        .collect();
    Manifest::from_streams(streams)
}

/// Generates manifest text. See [`generate_manifest`].
pub fn generate_manifest_text(streams: usize, blocks: usize, files: usize) -> String {
    generate_manifest(streams, blocks, files)
        .to_text()
        .expect("generated manifests are valid")
}

/// Fills an in-memory store with `count` generated collections and returns
/// the store and their ids.
pub fn populated_store(
    count: usize,
    streams: usize,
    blocks: usize,
    files: usize,
) -> (InMemoryStore, Vec<CollectionId>) {
    let store = InMemoryStore::new();
    let ids = (0..count)
        .map(|i| {
            let text = generate_manifest_text(streams, blocks, files);
            store
                .create_collection(&format!("bench {i}"), &text)
                .expect("in-memory store accepts every manifest")
        })
        .collect();
    (store, ids)
}
