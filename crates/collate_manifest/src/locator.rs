//! Content block locators.

use crate::error::{ManifestError, ManifestResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Length of the hex content hash at the start of every locator.
pub const HASH_HEX_LEN: usize = 32;

/// A reference to an immutable content block: `hash+size(+hint)*`.
///
/// Two locators are equal when hash and size match. Hints (permission
/// signatures, remote cluster markers, ...) are carried through
/// serialization but do not take part in equality.
#[derive(Debug, Clone, Eq)]
pub struct Locator {
    hash: String,
    size: u64,
    hints: Vec<String>,
}

impl Locator {
    /// Creates a locator without hints.
    ///
    /// # Errors
    ///
    /// Returns an error if `hash` is not 32 lowercase hex characters.
    pub fn new(hash: impl Into<String>, size: u64) -> ManifestResult<Self> {
        let hash = hash.into();
        check_hash(&hash)?;
        Ok(Self {
            hash,
            size,
            hints: Vec::new(),
        })
    }

    /// Parses a locator token.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidLocator`] if the token does not match
    /// `hash+size(+hint)*`.
    pub fn parse(token: &str) -> ManifestResult<Self> {
        let mut parts = token.split('+');
        let hash = parts.next().unwrap_or_default();
        check_hash(hash).map_err(|_| {
            ManifestError::invalid_locator(token, "hash must be 32 lowercase hex digits")
        })?;

        let size = parts
            .next()
            .ok_or_else(|| ManifestError::invalid_locator(token, "missing size"))?;
        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ManifestError::invalid_locator(token, "size must be decimal"));
        }
        let size: u64 = size
            .parse()
            .map_err(|_| ManifestError::invalid_locator(token, "size out of range"))?;

        let mut hints = Vec::new();
        for hint in parts {
            if !hint.starts_with(|c: char| c.is_ascii_uppercase()) {
                return Err(ManifestError::invalid_locator(
                    token,
                    "hints must start with an uppercase letter",
                ));
            }
            hints.push(hint.to_string());
        }

        Ok(Self {
            hash: hash.to_string(),
            size,
            hints,
        })
    }

    /// Returns true if `token` is a syntactically valid locator.
    #[must_use]
    pub fn is_locator(token: &str) -> bool {
        Self::parse(token).is_ok()
    }

    /// Returns the hex content hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the block size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the hint tokens (without their leading `+`).
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Returns a copy of this locator with a hint appended.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

fn check_hash(hash: &str) -> ManifestResult<()> {
    let ok = hash.len() == HASH_HEX_LEN
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if ok {
        Ok(())
    } else {
        Err(ManifestError::invalid_locator(
            hash,
            "hash must be 32 lowercase hex digits",
        ))
    }
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.size == other.size
    }
}

impl Hash for Locator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
        self.size.hash(state);
    }
}

impl FromStr for Locator {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.hash, self.size)?;
        for hint in &self.hints {
            write!(f, "+{hint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "7a6ef4c162a5c6413070a8bd0bffc818";

    #[test]
    fn parse_plain_locator() {
        let loc = Locator::parse("7a6ef4c162a5c6413070a8bd0bffc818+150").unwrap();
        assert_eq!(loc.hash(), HASH);
        assert_eq!(loc.size(), 150);
        assert!(loc.hints().is_empty());
    }

    #[test]
    fn parse_with_hints() {
        let token = "acbd18db4cc2f85cedef654fccc4a4d8+3+A0123456789abcdef@565f7d9b+K@zzzzz";
        let loc = Locator::parse(token).unwrap();
        assert_eq!(loc.size(), 3);
        assert_eq!(loc.hints().len(), 2);
        assert_eq!(loc.to_string(), token);
    }

    #[test]
    fn equality_ignores_hints() {
        let a = Locator::new(HASH, 150).unwrap();
        let b = Locator::new(HASH, 150).unwrap().with_hint("K@zzzzz");
        assert_eq!(a, b);
        assert_ne!(a, Locator::new(HASH, 151).unwrap());
    }

    #[test]
    fn rejects_bad_hash() {
        assert!(Locator::parse("xyz+3").is_err());
        assert!(Locator::parse("7A6EF4C162A5C6413070A8BD0BFFC818+3").is_err());
        assert!(Locator::parse("7a6ef4c162a5c6413070a8bd0bffc81+3").is_err());
    }

    #[test]
    fn rejects_bad_size() {
        assert!(Locator::parse(HASH).is_err());
        assert!(Locator::parse(&format!("{HASH}+")).is_err());
        assert!(Locator::parse(&format!("{HASH}+-1")).is_err());
        assert!(Locator::parse(&format!("{HASH}+1x")).is_err());
    }

    #[test]
    fn rejects_lowercase_hint() {
        assert!(Locator::parse(&format!("{HASH}+3+abc")).is_err());
        assert!(Locator::parse(&format!("{HASH}+3+")).is_err());
    }

    #[test]
    fn segment_token_is_not_locator() {
        assert!(!Locator::is_locator("0:0:foo"));
    }
}
