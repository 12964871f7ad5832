//! Property tests for the manifest codec and the merge pipeline.

use collate_core::{
    BlockIndexRemapper, Combiner, MergedManifest, NameDeduplicator, Selector, SelectionResolver,
    StreamAggregator,
};
use collate_manifest::{Locator, Manifest, ManifestEncoder, Stream};
use collate_store::{CollectionStore, InMemoryStore};
use collate_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn store_with(manifests: &[Manifest]) -> (InMemoryStore, Vec<String>) {
    let store = InMemoryStore::new();
    let selectors = manifests
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let text = m.to_text().unwrap();
            store
                .create_collection(&format!("generated {i}"), &text)
                .unwrap()
                .to_string()
        })
        .collect();
    (store, selectors)
}

/// Stores `manifest` with its lines in list order, repeated paths included.
fn store_lines(store: &InMemoryStore, manifest: &Manifest) -> String {
    let mut encoder = ManifestEncoder::new();
    for stream in &manifest.streams {
        encoder.encode_stream(stream).unwrap();
    }
    store
        .create_collection("lines", &encoder.into_text())
        .unwrap()
        .to_string()
}

/// (block, offset, length) of every segment, sorted.
fn byte_ranges(stream: &Stream) -> Vec<(Locator, u64, u64)> {
    let mut ranges: Vec<(Locator, u64, u64)> = stream
        .segments
        .iter()
        .map(|s| (stream.locators[s.block_index].clone(), s.offset, s.length))
        .collect();
    ranges.sort_by(|a, b| {
        (a.0.hash(), a.0.size(), a.1, a.2).cmp(&(b.0.hash(), b.0.size(), b.1, b.2))
    });
    ranges
}

fn merge(store: &InMemoryStore, selectors: &[String]) -> MergedManifest {
    Combiner::new(store).merge(selectors).unwrap()
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn text_round_trips(manifest in manifest_strategy(4)) {
        let text = manifest.to_text().unwrap();
        let decoded = Manifest::parse(&text).unwrap();

        let mut expected = manifest.streams.clone();
        expected.sort_by(|a, b| a.path.cmp(&b.path));
        prop_assert_eq!(&expected, &decoded.streams);
        prop_assert_eq!(decoded.to_text().unwrap(), text);
    }

    #[test]
    fn merged_indices_are_valid_and_bytes_unchanged(
        manifests in prop::collection::vec(manifest_strategy(3), 1..4)
    ) {
        let (store, selectors) = store_with(&manifests);
        let merged = merge(&store, &selectors);

        let mut sources: BTreeMap<&str, Vec<(Locator, u64, u64)>> = BTreeMap::new();
        for manifest in &manifests {
            for stream in &manifest.streams {
                sources.entry(stream.path.as_str()).or_default().extend(byte_ranges(stream));
            }
        }

        prop_assert_eq!(merged.len(), sources.len());
        for stream in merged.streams() {
            for segment in &stream.segments {
                prop_assert!(segment.block_index < stream.locators.len());
            }
            let mut expected = sources[stream.path.as_str()].clone();
            expected.sort_by(|a, b| {
                (a.0.hash(), a.0.size(), a.1, a.2).cmp(&(b.0.hash(), b.0.size(), b.1, b.2))
            });
            prop_assert_eq!(byte_ranges(stream), expected);
        }
    }

    #[test]
    fn dedup_is_deterministic(manifests in prop::collection::vec(manifest_strategy(2), 1..4)) {
        let (store, selectors) = store_with(&manifests);
        let first = merge(&store, &selectors);
        let second = merge(&store, &selectors);
        prop_assert_eq!(&first, &second);

        let parsed: Vec<Selector> = selectors.iter().map(|s| Selector::parse(s).unwrap()).collect();
        let fragments = SelectionResolver::new(&store).resolve(&parsed).unwrap();
        for (_, group) in StreamAggregator::aggregate(fragments) {
            let remapped = BlockIndexRemapper::remap(group).unwrap();
            prop_assert_eq!(
                NameDeduplicator::assign_names(&remapped),
                NameDeduplicator::assign_names(&remapped)
            );
        }
    }

    #[test]
    fn suffixes_increase_in_order_of_appearance(copies in 2usize..6, name in file_name_strategy()) {
        let store = fixture_store();
        let text = format!(". {FOO_BLOCK} 0:0:{}\n", collate_manifest::escape_name(&name));
        let id = store.create_collection("one", &text).unwrap();
        let selectors: Vec<String> = (0..copies).map(|_| format!("{id}")).collect();

        let merged = merge(&store, &selectors);
        let root = merged.stream(".").unwrap();
        let names: Vec<String> = root.segments.iter().map(|s| s.name.clone()).collect();
        let mut expected = vec![name.clone()];
        expected.extend((1..copies).map(|n| collate_core::suffixed_name(&name, n)));
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn suffixes_never_leak_across_streams(
        manifests in prop::collection::vec(manifest_strategy(3), 1..4)
    ) {
        let (store, selectors) = store_with(&manifests);
        let merged = merge(&store, &selectors);

        // Per destination: one file per (source stream, name).
        let mut files: BTreeMap<&str, usize> = BTreeMap::new();
        let mut names: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for manifest in &manifests {
            for stream in &manifest.streams {
                let distinct: BTreeSet<&str> =
                    stream.segments.iter().map(|s| s.name.as_str()).collect();
                *files.entry(stream.path.as_str()).or_default() += distinct.len();
                names.entry(stream.path.as_str()).or_default().extend(distinct);
            }
        }

        for stream in merged.streams() {
            let out: BTreeSet<&str> = stream.segments.iter().map(|s| s.name.as_str()).collect();
            let path = stream.path.as_str();
            prop_assert_eq!(out.len(), files[path]);
            let suffixed = out.iter().filter(|n| n.contains('(')).count();
            prop_assert_eq!(suffixed, files[path] - names[path].len());
        }
    }

    #[test]
    fn repeated_stream_lines_keep_file_names(
        (manifest, split) in split_manifest_strategy(3)
    ) {
        let store = InMemoryStore::new();
        let whole = store_lines(&store, &manifest);
        let lines = store_lines(&store, &split);

        let names = |s: &Stream| s.segments.iter().map(|seg| seg.name.clone()).collect::<Vec<_>>();
        let expected = merge(&store, &[whole.clone()]);
        let merged = merge(&store, &[lines.clone()]);
        prop_assert_eq!(merged.len(), expected.len());
        for stream in expected.streams() {
            let got = merged.stream(&stream.path).unwrap();
            prop_assert_eq!(names(got), names(stream));
            prop_assert_eq!(byte_ranges(got), byte_ranges(stream));
        }

        for stream in &manifest.streams {
            let dir = stream.path.trim_start_matches('.').trim_start_matches('/');
            for file in stream.files() {
                if file.name.contains('/') || file.name.trim() != file.name {
                    continue;
                }
                let path = if dir.is_empty() {
                    file.name.clone()
                } else {
                    format!("{dir}/{}", file.name)
                };
                let expected = merge(&store, &[format!("{whole}/{path}")]);
                let merged = merge(&store, &[format!("{lines}/{path}")]);
                let expected = expected.stream(".").unwrap();
                let merged = merged.stream(".").unwrap();
                prop_assert_eq!(byte_ranges(merged), byte_ranges(expected));
                prop_assert_eq!(names(merged), names(expected));
            }
        }
    }
}
