//! Fuzz harnesses for the manifest codec.
//!
//! Each target accepts arbitrary bytes and must never panic. They can be
//! driven by cargo-fuzz or by the proptest wrappers in this module's tests.

use collate_manifest::{decode_stream_line, unescape_name, Manifest};

/// Decodes arbitrary bytes as manifest text. Must only ever return errors.
pub fn fuzz_manifest_decode(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = Manifest::parse(text);
    for line in text.lines() {
        let _ = decode_stream_line(line);
    }
}

/// Checks that anything the decoder accepts re-encodes to text that
/// decodes to the same manifest.
///
/// # Panics
///
/// Panics if the round trip changes the manifest.
pub fn fuzz_manifest_roundtrip(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(manifest) = Manifest::parse(text) else {
        return;
    };
    let Ok(encoded) = manifest.to_text() else {
        return;
    };
    let decoded = Manifest::parse(&encoded).expect("encoded manifest must decode");
    let mut original = manifest.streams;
    original.sort_by(|a, b| a.path.cmp(&b.path));
    assert_eq!(original, decoded.streams, "Roundtrip mismatch");
}

/// Unescapes arbitrary text as a file name.
pub fn fuzz_unescape(data: &[u8]) {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = unescape_name(text);
    }
}
