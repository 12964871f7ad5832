//! In-memory manifest model: streams, file segments and whole manifests.

use crate::error::{ManifestError, ManifestResult};
use crate::locator::Locator;
use serde::Serialize;

/// Path of the root stream.
pub const ROOT_STREAM: &str = ".";

/// A byte range of one block in a stream, tagged with a file name.
///
/// A file that spans several blocks is written as several segments that
/// share the same name inside one stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileSegment {
    /// Position of the block in the owning stream's locator list.
    pub block_index: usize,
    /// Byte offset inside that block.
    pub offset: u64,
    /// Number of bytes covered, derived from the block size at parse time.
    pub length: u64,
    /// Decoded file name.
    pub name: String,
}

impl FileSegment {
    /// Creates a segment.
    pub fn new(block_index: usize, offset: u64, length: u64, name: impl Into<String>) -> Self {
        Self {
            block_index,
            offset,
            length,
            name: name.into(),
        }
    }

    /// Creates a segment covering `locator` from `offset` to the end of the block.
    pub fn spanning(
        block_index: usize,
        offset: u64,
        locator: &Locator,
        name: impl Into<String>,
    ) -> Self {
        Self::new(
            block_index,
            offset,
            locator.size().saturating_sub(offset),
            name,
        )
    }
}

/// A directory-like stream: an ordered block list plus the file segments
/// that reference those blocks by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// Stream path, `.` or `./dir/...`.
    pub path: String,
    /// Ordered block list. Segments refer to blocks by index.
    pub locators: Vec<Locator>,
    /// File segments in manifest order.
    pub segments: Vec<FileSegment>,
}

/// Per-file view of a stream, used for inspection output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// File name.
    pub name: String,
    /// Total bytes across all segments of the file.
    pub size: u64,
    /// Number of segments making up the file.
    pub segments: usize,
}

impl Stream {
    /// Creates an empty stream with the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            locators: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Returns true if this is the root stream `.`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == ROOT_STREAM
    }

    /// Returns the segments that belong to the file `name`.
    pub fn segments_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FileSegment> {
        self.segments.iter().filter(move |s| s.name == name)
    }

    /// Returns true if the stream has at least one segment named `name`.
    #[must_use]
    pub fn has_file(&self, name: &str) -> bool {
        self.segments.iter().any(|s| s.name == name)
    }

    /// Groups segments into files, in order of first appearance.
    #[must_use]
    pub fn files(&self) -> Vec<FileSummary> {
        let mut files: Vec<FileSummary> = Vec::new();
        for seg in &self.segments {
            match files.iter_mut().find(|f| f.name == seg.name) {
                Some(file) => {
                    file.size += seg.length;
                    file.segments += 1;
                }
                None => files.push(FileSummary {
                    name: seg.name.clone(),
                    size: seg.length,
                    segments: 1,
                }),
            }
        }
        files
    }

    /// Total bytes referenced by the stream's segments.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Checks that the stream can be written as a manifest line and that
    /// every segment points at a real byte range of its block.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Unencodable`] describing the first problem.
    pub fn validate(&self) -> ManifestResult<()> {
        check_stream_path(&self.path)
            .map_err(|reason| ManifestError::unencodable(&self.path, reason))?;
        if self.locators.is_empty() {
            return Err(ManifestError::unencodable(&self.path, "no locators"));
        }
        if self.segments.is_empty() {
            return Err(ManifestError::unencodable(&self.path, "no file segments"));
        }
        for seg in &self.segments {
            let Some(block) = self.locators.get(seg.block_index) else {
                return Err(ManifestError::unencodable(
                    &self.path,
                    format!(
                        "segment {:?} references block {} of {}",
                        seg.name,
                        seg.block_index,
                        self.locators.len()
                    ),
                ));
            };
            if seg.offset.saturating_add(seg.length) > block.size() {
                return Err(ManifestError::unencodable(
                    &self.path,
                    format!("segment {:?} extends past the end of {block}", seg.name),
                ));
            }
            if seg.name.is_empty() {
                return Err(ManifestError::unencodable(&self.path, "empty file name"));
            }
        }
        Ok(())
    }
}

/// Validates a stream path: `.` or `./` followed by non-empty components
/// that are neither `.` nor `..`.
///
/// # Errors
///
/// Returns a short reason when the path is rejected.
pub fn check_stream_path(path: &str) -> Result<(), &'static str> {
    if path == ROOT_STREAM {
        return Ok(());
    }
    let Some(rest) = path.strip_prefix("./") else {
        return Err("stream path must be '.' or start with './'");
    };
    for component in rest.split('/') {
        match component {
            "" => return Err("stream path has an empty component"),
            "." | ".." => return Err("stream path has a relative component"),
            _ => {}
        }
    }
    Ok(())
}

/// A parsed manifest: an ordered sequence of streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Streams in the order they appeared (or were added).
    pub streams: Vec<Stream>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manifest from streams.
    #[must_use]
    pub fn from_streams(streams: Vec<Stream>) -> Self {
        Self { streams }
    }

    /// Returns true if the manifest has no streams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Looks up a stream by path. Returns the first line with that path;
    /// use [`Manifest::coalesced`] first when paths may repeat.
    #[must_use]
    pub fn stream(&self, path: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.path == path)
    }

    /// Merges lines that share a stream path into one stream each.
    ///
    /// Merged streams keep the position of their first line. A later line's
    /// blocks are appended to the block list and its segment indices are
    /// shifted by the number of blocks already there, so every segment still
    /// covers the same bytes.
    #[must_use]
    pub fn coalesced(&self) -> Manifest {
        let mut streams: Vec<Stream> = Vec::with_capacity(self.streams.len());
        for line in &self.streams {
            let Some(target) = streams.iter_mut().find(|s| s.path == line.path) else {
                streams.push(line.clone());
                continue;
            };
            let base = target.locators.len();
            target.locators.extend(line.locators.iter().cloned());
            target
                .segments
                .extend(line.segments.iter().map(|seg| FileSegment {
                    block_index: base + seg.block_index,
                    ..seg.clone()
                }));
        }
        Manifest { streams }
    }

    /// Total number of locators across all streams.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.streams.iter().map(|s| s.locators.len()).sum()
    }

    /// Total number of distinct files across all streams.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.streams.iter().map(|s| s.files().len()).sum()
    }

    /// Total bytes referenced by all file segments.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.streams.iter().map(Stream::total_bytes).sum()
    }
}
