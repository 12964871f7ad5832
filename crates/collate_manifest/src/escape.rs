//! Escaping of names and stream paths in manifest text.
//!
//! Tokens in a manifest line are separated by whitespace, so spaces, ASCII
//! control characters and the escape character itself are written as
//! three-digit octal escapes (`\040` for a space). Decoding accepts any
//! `\ooo` escape.

use crate::error::{ManifestError, ManifestResult};
use std::borrow::Cow;

fn needs_escape(b: u8) -> bool {
    b == b' ' || b == b'\\' || b.is_ascii_control()
}

/// Escapes a file name or stream path for use as a manifest token.
#[must_use]
pub fn escape_name(name: &str) -> Cow<'_, str> {
    if !name.bytes().any(needs_escape) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        if c.is_ascii() && needs_escape(c as u8) {
            out.push_str(&format!("\\{:03o}", c as u8));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Decodes `\ooo` escapes in a manifest token.
///
/// # Errors
///
/// Returns [`ManifestError::InvalidEscape`] if a backslash is not followed by
/// three octal digits, the value exceeds one byte, or the decoded bytes are
/// not valid UTF-8.
pub fn unescape_name(raw: &str) -> ManifestResult<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }
    let invalid = || ManifestError::InvalidEscape {
        text: raw.to_string(),
    };

    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let digits = bytes.get(i + 1..i + 4).ok_or_else(invalid)?;
        let mut value: u32 = 0;
        for &d in digits {
            if !(b'0'..=b'7').contains(&d) {
                return Err(invalid());
            }
            value = value * 8 + u32::from(d - b'0');
        }
        let byte = u8::try_from(value).map_err(|_| invalid())?;
        out.push(byte);
        i += 4;
    }

    String::from_utf8(out).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_names_are_borrowed() {
        assert!(matches!(escape_name("alice.txt"), Cow::Borrowed("alice.txt")));
    }

    #[test]
    fn space_becomes_octal() {
        assert_eq!(escape_name("my file.txt"), "my\\040file.txt");
        assert_eq!(escape_name("a\\b"), "a\\134b");
        assert_eq!(escape_name("form\x0cfeed"), "form\\014feed");
    }

    #[test]
    fn unescape_restores_name() {
        assert_eq!(unescape_name("my\\040file.txt").unwrap(), "my file.txt");
        assert_eq!(unescape_name("tab\\011x").unwrap(), "tab\tx");
    }

    #[test]
    fn unescape_roundtrips_unicode() {
        let name = "résumé final.pdf";
        assert_eq!(unescape_name(&escape_name(name)).unwrap(), name);
    }

    #[test]
    fn unescape_rejects_truncated_escape() {
        assert!(unescape_name("bad\\04").is_err());
        assert!(unescape_name("bad\\").is_err());
    }

    #[test]
    fn unescape_rejects_non_octal() {
        assert!(unescape_name("bad\\089").is_err());
    }

    #[test]
    fn unescape_rejects_overflow() {
        assert!(unescape_name("bad\\777").is_err());
    }

    proptest! {
        #[test]
        fn escaped_names_are_single_tokens(name in "\\PC*[ \t\n\r\\\\]\\PC*") {
            let escaped = escape_name(&name);
            prop_assert!(!escaped.chars().any(|c| c.is_ascii_whitespace()));
            prop_assert_eq!(unescape_name(&escaped).unwrap(), name);
        }
    }
}
