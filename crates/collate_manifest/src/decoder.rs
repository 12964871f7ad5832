//! Manifest text decoder.

use crate::error::{ManifestError, ManifestResult};
use crate::escape::unescape_name;
use crate::locator::Locator;
use crate::stream::{check_stream_path, FileSegment, Manifest, Stream};
use std::str::FromStr;

/// Decode manifest text into a [`Manifest`].
///
/// Empty or whitespace-only input yields an empty manifest.
///
/// # Errors
///
/// Returns [`ManifestError::Malformed`] for the first line that does not
/// follow `<stream-path> <locator>+ <segment>+`, or whose segments point
/// outside the line's block list.
pub fn parse_manifest(text: &str) -> ManifestResult<Manifest> {
    let streams = ManifestDecoder::new(text).collect::<ManifestResult<Vec<_>>>()?;
    Ok(Manifest::from_streams(streams))
}

impl Manifest {
    /// Parses manifest text. See [`parse_manifest`].
    pub fn parse(text: &str) -> ManifestResult<Self> {
        parse_manifest(text)
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_manifest(s)
    }
}

/// A streaming manifest decoder yielding one [`Stream`] per non-blank line.
pub struct ManifestDecoder<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> ManifestDecoder<'a> {
    /// Create a decoder over manifest text.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_no: 0,
        }
    }
}

impl Iterator for ManifestDecoder<'_> {
    type Item = ManifestResult<Stream>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            if line.trim_matches(|c: char| c.is_ascii_whitespace()).is_empty() {
                continue;
            }
            return Some(decode_stream_line(line).map_err(|e| e.at_line(self.line_no)));
        }
    }
}

/// Decode a single stream line.
///
/// # Errors
///
/// Returns an error if the line is not a valid stream line. Errors carry no
/// line number; [`ManifestDecoder`] attaches one.
pub fn decode_stream_line(line: &str) -> ManifestResult<Stream> {
    let mut tokens = line.split_ascii_whitespace().peekable();

    let raw_path = tokens
        .next()
        .ok_or_else(|| ManifestError::malformed(0, "empty stream line"))?;
    let path = unescape_name(raw_path)?;
    check_stream_path(&path).map_err(|reason| ManifestError::malformed(0, reason))?;

    let mut stream = Stream::new(path);

    while let Some(token) = tokens.peek() {
        match Locator::parse(token) {
            Ok(locator) => {
                stream.locators.push(locator);
                tokens.next();
            }
            Err(_) => break,
        }
    }
    if stream.locators.is_empty() {
        return Err(ManifestError::malformed(
            0,
            format!("stream {:?} has no locators", stream.path),
        ));
    }

    for token in tokens {
        let segment = decode_segment(token, &stream.locators)?;
        stream.segments.push(segment);
    }
    if stream.segments.is_empty() {
        return Err(ManifestError::malformed(
            0,
            format!("stream {:?} has no file segments", stream.path),
        ));
    }

    Ok(stream)
}

/// Decode a `blockIndex:offset:filename` token against the line's block list.
fn decode_segment(token: &str, locators: &[Locator]) -> ManifestResult<FileSegment> {
    let mut parts = token.splitn(3, ':');
    let (Some(index), Some(offset), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ManifestError::invalid_segment(
            token,
            "expected blockIndex:offset:filename",
        ));
    };

    let block_index = parse_decimal(index)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| ManifestError::invalid_segment(token, "block index must be decimal"))?;
    let offset = parse_decimal(offset)
        .ok_or_else(|| ManifestError::invalid_segment(token, "offset must be decimal"))?;

    let name = unescape_name(name)?;
    if name.is_empty() {
        return Err(ManifestError::invalid_segment(token, "empty file name"));
    }

    let block = locators.get(block_index).ok_or_else(|| {
        ManifestError::invalid_segment(token, "block index out of range for this stream")
    })?;
    if offset > block.size() {
        return Err(ManifestError::invalid_segment(
            token,
            "offset past the end of the block",
        ));
    }

    Ok(FileSegment::spanning(block_index, offset, block, name))
}

fn parse_decimal(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
