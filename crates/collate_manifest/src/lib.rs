//! # Collate Manifest
//!
//! Collection manifest model, parser and serializer.
//!
//! A manifest describes a collection as one line per directory-like
//! *stream*. Each line lists the stream path, the content block locators the
//! stream uses, and the file segments that reference those blocks by
//! position:
//!
//! ```text
//! ./dir1 acbd18db4cc2f85cedef654fccc4a4d8+3 37b51d194a7513e45b56f6524f2d51f2+3 0:0:foo 1:0:bar
//! ```
//!
//! ## Grammar
//!
//! - Locator: `hash+size(+hint)*`, hash is 32 lowercase hex digits
//! - Segment: `blockIndex:offset:filename`, the segment covers its block
//!   from `offset` to the end of the block
//! - Names and stream paths escape spaces, control characters and `\` as `\ooo`
//!
//! ## Usage
//!
//! ```
//! use collate_manifest::Manifest;
//!
//! let text = ". acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:foo\n";
//! let manifest = Manifest::parse(text).unwrap();
//! assert_eq!(manifest.streams[0].segments[0].name, "foo");
//! assert_eq!(manifest.to_text().unwrap(), text);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod escape;
mod locator;
mod stream;

pub use decoder::{decode_stream_line, parse_manifest, ManifestDecoder};
pub use encoder::{to_manifest_text, ManifestEncoder};
pub use error::{ManifestError, ManifestResult};
pub use escape::{escape_name, unescape_name};
pub use locator::{Locator, HASH_HEX_LEN};
pub use stream::{check_stream_path, FileSegment, FileSummary, Manifest, Stream, ROOT_STREAM};

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI: &str = ". acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:foo\n\
                         ./dir1 37b51d194a7513e45b56f6524f2d51f2+3+K@zzzzz 0:0:bar 0:1:my\\040bar\n\
                         ./dir1/subdir d41d8cd98f00b204e9800998ecf8427e+0 0:0:file1 0:0:file2\n";

    #[test]
    fn canonical_text_is_stable() {
        let manifest = Manifest::parse(MULTI).unwrap();
        assert_eq!(manifest.to_text().unwrap(), MULTI);
    }

    #[test]
    fn manifest_statistics() {
        let manifest: Manifest = MULTI.parse().unwrap();
        assert_eq!(manifest.block_count(), 3);
        assert_eq!(manifest.file_count(), 5);
        assert_eq!(manifest.total_bytes(), 3 + 3 + 2);
        assert!(manifest.stream("./dir1/subdir").is_some());
        assert!(manifest.stream("./dir2").is_none());
    }
}
