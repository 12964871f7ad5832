//! Destination path canonicalization.
//!
//! Rules:
//! - a whole-collection selection keeps each stream at its source path;
//! - a sub-path selection (file or sub-stream) lands in the root stream `.`;
//! - a bare locator lands in the root stream `.`.

use crate::selector::Selector;
use collate_manifest::ROOT_STREAM;

/// Canonicalizes a path inside a collection.
///
/// Leading `./` and `/`, repeated separators, `.` components and trailing
/// separators are dropped. The root is returned as an empty string.
///
/// # Errors
///
/// Returns a short reason if the path contains a `..` component.
pub fn canonical_sub_path(raw: &str) -> Result<String, &'static str> {
    let mut parts = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {}
            ".." => return Err("path must not contain '..'"),
            other => parts.push(other),
        }
    }
    Ok(parts.join("/"))
}

/// Converts a canonical sub-path into a stream path (`.` or `./a/b`).
#[must_use]
pub fn stream_path_for(sub_path: &str) -> String {
    if sub_path.is_empty() {
        ROOT_STREAM.to_string()
    } else {
        format!("./{sub_path}")
    }
}

/// Normalizes a stream path so that equivalent spellings group together.
///
/// Paths that cannot be canonicalized are returned unchanged and rejected
/// later by manifest validation.
#[must_use]
pub fn normalize_stream_path(path: &str) -> String {
    match canonical_sub_path(path) {
        Ok(sub) => stream_path_for(&sub),
        Err(_) => path.to_string(),
    }
}

/// Returns the stream a fragment resolved from `selector` is written to.
///
/// `source_stream` is the path of the stream the fragment was read from.
#[must_use]
pub fn destination_path(selector: &Selector, source_stream: &str) -> String {
    match selector {
        Selector::WholeCollection(_) => normalize_stream_path(source_stream),
        Selector::SubPath(..) | Selector::BareLocator(_) => ROOT_STREAM.to_string(),
    }
}
