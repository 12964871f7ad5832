//! Manifest text encoder.
//!
//! Output is canonical: streams are sorted by path (`.` first), locators
//! keep their list order, segments keep their list order, and every line
//! ends with `\n`.

use crate::error::ManifestResult;
use crate::escape::escape_name;
use crate::stream::{Manifest, Stream};
use std::fmt::Write;

/// Encode streams into manifest text.
///
/// # Errors
///
/// Returns [`crate::ManifestError::Unencodable`] if a stream has no locators,
/// no segments, or a segment that points outside its block list.
pub fn to_manifest_text<'a, I>(streams: I) -> ManifestResult<String>
where
    I: IntoIterator<Item = &'a Stream>,
{
    let mut encoder = ManifestEncoder::new();
    let mut sorted: Vec<&Stream> = streams.into_iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));
    for stream in sorted {
        encoder.encode_stream(stream)?;
    }
    Ok(encoder.into_text())
}

/// Incremental manifest encoder. Streams are written in call order.
#[derive(Debug, Default)]
pub struct ManifestEncoder {
    buffer: String,
}

impl ManifestEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one stream line.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails [`Stream::validate`].
    pub fn encode_stream(&mut self, stream: &Stream) -> ManifestResult<()> {
        stream.validate()?;

        self.buffer.push_str(&escape_name(&stream.path));
        for locator in &stream.locators {
            // Writing to a String cannot fail.
            let _ = write!(self.buffer, " {locator}");
        }
        for seg in &stream.segments {
            let _ = write!(
                self.buffer,
                " {}:{}:{}",
                seg.block_index,
                seg.offset,
                escape_name(&seg.name)
            );
        }
        self.buffer.push('\n');
        Ok(())
    }

    /// Consume the encoder and return the text.
    pub fn into_text(self) -> String {
        self.buffer
    }
}

impl Manifest {
    /// Renders canonical manifest text. See [`to_manifest_text`].
    pub fn to_text(&self) -> ManifestResult<String> {
        to_manifest_text(&self.streams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::parse_manifest;
    use crate::locator::Locator;
    use crate::stream::FileSegment;

    #[test]
    fn streams_sorted_root_first() {
        let text = "./dir2 acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:b\n\
                    . acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:a\n\
                    ./dir1 acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:c\n";
        let out = parse_manifest(text).unwrap().to_text().unwrap();
        let paths: Vec<&str> = out.lines().map(|l| l.split(' ').next().unwrap()).collect();
        assert_eq!(paths, vec![".", "./dir1", "./dir2"]);
    }

    #[test]
    fn spaces_are_escaped() {
        let mut stream = Stream::new("./my dir");
        stream.locators = vec![Locator::new("acbd18db4cc2f85cedef654fccc4a4d8", 3).unwrap()];
        stream.segments = vec![FileSegment::new(0, 0, 3, "a b")];
        let out = to_manifest_text([&stream]).unwrap();
        assert_eq!(
            out,
            "./my\\040dir acbd18db4cc2f85cedef654fccc4a4d8+3 0:0:a\\040b\n"
        );
    }

    #[test]
    fn hints_are_kept() {
        let text = ". acbd18db4cc2f85cedef654fccc4a4d8+3+K@zzzzz 0:0:foo\n";
        let out = parse_manifest(text).unwrap().to_text().unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn empty_stream_is_unencodable() {
        let stream = Stream::new(".");
        assert!(to_manifest_text([&stream]).is_err());
    }

    #[test]
    fn empty_manifest_encodes_to_empty_text() {
        assert_eq!(Manifest::new().to_text().unwrap(), "");
    }
}
