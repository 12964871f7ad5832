//! File name deduplication within a merged stream.
//!
//! A file is identified by the fragment it came from and its original name.
//! The resolver emits one fragment per selector and source stream path, even
//! when the source repeats that path on several lines, so the segments of
//! one multi-block file keep a single name. When a later
//! file wants a name that an earlier file already holds, it gets a numbered
//! suffix: `foo`, `foo(1)`, `foo(2)`, and `alice.txt`, `alice(1).txt`.

use crate::remap::RemappedStream;
use crate::resolver::FragmentId;
use collate_manifest::Stream;
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Renames colliding files inside one stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameDeduplicator;

impl NameDeduplicator {
    /// Applies suffixes to colliding files and returns the finished stream.
    #[must_use]
    pub fn deduplicate(stream: RemappedStream) -> Stream {
        let names = Self::assign_names(&stream);
        let segments = stream
            .segments
            .into_iter()
            .map(|remapped| {
                let mut segment = remapped.segment;
                if let Some(name) = names.get(&(remapped.fragment, segment.name.clone())) {
                    segment.name.clone_from(name);
                }
                segment
            })
            .collect();
        Stream {
            path: stream.path,
            locators: stream.locators,
            segments,
        }
    }

    /// Computes the final name of every file in `stream`, keyed by
    /// `(fragment, original name)`.
    ///
    /// Files are visited in segment order. Candidates that any file in the
    /// stream already uses, as an original or an assigned name, are skipped.
    #[must_use]
    pub fn assign_names(stream: &RemappedStream) -> HashMap<(FragmentId, String), String> {
        let taken: HashSet<&str> = stream
            .segments
            .iter()
            .map(|s| s.segment.name.as_str())
            .collect();
        let mut claimed: HashSet<String> = HashSet::new();
        let mut counters: HashMap<&str, usize> = HashMap::new();
        let mut assigned: HashMap<(FragmentId, String), String> = HashMap::new();

        for remapped in &stream.segments {
            let name = remapped.segment.name.as_str();
            let key = (remapped.fragment, name.to_string());
            if assigned.contains_key(&key) {
                continue;
            }
            if claimed.insert(name.to_string()) {
                assigned.insert(key, name.to_string());
                continue;
            }

            let counter = counters.entry(name).or_insert(1);
            let candidate = loop {
                let candidate = suffixed_name(name, *counter);
                *counter += 1;
                if !taken.contains(candidate.as_str()) && !claimed.contains(&candidate) {
                    break candidate;
                }
            };
            claimed.insert(candidate.clone());
            info!(
                stream = %stream.path,
                fragment = %remapped.fragment,
                from = name,
                to = %candidate,
                "Renamed colliding file"
            );
            assigned.insert(key, candidate);
        }
        assigned
    }
}

/// Inserts `(n)` before the extension of `name`, or at the end when the name
/// has no extension. A leading `.` does not start an extension.
#[must_use]
pub fn suffixed_name(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}({n}){}", &name[..dot], &name[dot..]),
        _ => format!("{name}({n})"),
    }
}
