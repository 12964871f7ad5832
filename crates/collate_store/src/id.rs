//! Collection identifiers.
//!
//! Two textual forms are accepted:
//!
//! - hyphenated UUIDs, e.g. `0f4e9c1a-6d1e-4c55-9a57-3f0b8a3c2d11`, which is
//!   also the form of every newly created id
//! - cluster-scoped ids, e.g. `zzzzz-4zz18-znfnqtbbv4spc3w`: a five character
//!   cluster prefix, the collection type infix `4zz18`, and fifteen
//!   characters, all lowercase ASCII letters or digits

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

const SCOPED_INFIX: &str = "4zz18";
const CLUSTER_LEN: usize = 5;
const SUFFIX_LEN: usize = 15;
const SCOPED_LEN: usize = CLUSTER_LEN + 1 + SCOPED_INFIX.len() + 1 + SUFFIX_LEN;

/// Identifier of a stored collection. Opaque to everything but the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CollectionId {
    /// A hyphenated UUID.
    Uuid(Uuid),
    /// A cluster-scoped id, `<cluster>-4zz18-<suffix>`.
    Scoped(ScopedId),
}

/// The parts of a cluster-scoped id. Both parts are lowercase ASCII
/// alphanumerics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopedId {
    cluster: [u8; CLUSTER_LEN],
    suffix: [u8; SUFFIX_LEN],
}

impl ScopedId {
    /// Returns the five character cluster prefix.
    #[must_use]
    pub fn cluster(&self) -> &str {
        ascii_str(&self.cluster)
    }

    /// Returns the fifteen character unique part.
    #[must_use]
    pub fn suffix(&self) -> &str {
        ascii_str(&self.suffix)
    }
}

fn ascii_str(bytes: &[u8]) -> &str {
    // Only ever filled from validated ASCII.
    std::str::from_utf8(bytes).unwrap_or_default()
}

/// A string that is not a collection id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid collection id: {0:?}")]
pub struct InvalidCollectionId(pub String);

impl CollectionId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::Uuid(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self::Uuid(uuid)
    }

    /// Returns the underlying UUID, if this is a UUID id.
    #[must_use]
    pub const fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(uuid) => Some(uuid),
            Self::Scoped(_) => None,
        }
    }

    /// Parses either textual form. Returns `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.len() {
            36 => Uuid::parse_str(s).ok().map(Self::Uuid),
            SCOPED_LEN => parse_scoped(s).map(Self::Scoped),
            _ => None,
        }
    }
}

fn parse_scoped(s: &str) -> Option<ScopedId> {
    let mut parts = s.split('-');
    let (cluster, infix, suffix) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || infix != SCOPED_INFIX {
        return None;
    }
    let valid = |part: &str| {
        part.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    };
    if !valid(cluster) || !valid(suffix) {
        return None;
    }
    Some(ScopedId {
        cluster: cluster.as_bytes().try_into().ok()?,
        suffix: suffix.as_bytes().try_into().ok()?,
    })
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "{}", uuid.hyphenated()),
            Self::Scoped(id) => {
                write!(f, "{}-{SCOPED_INFIX}-{}", id.cluster(), id.suffix())
            }
        }
    }
}

impl FromStr for CollectionId {
    type Err = InvalidCollectionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidCollectionId(s.to_string()))
    }
}

impl From<CollectionId> for String {
    fn from(id: CollectionId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CollectionId {
    type Error = InvalidCollectionId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPED: &str = "zzzzz-4zz18-znfnqtbbv4spc3w";

    #[test]
    fn display_parse_roundtrip() {
        let id = CollectionId::new();
        let text = id.to_string();
        assert_eq!(CollectionId::parse(&text), Some(id));
        assert_eq!(text.parse::<CollectionId>().unwrap(), id);
    }

    #[test]
    fn scoped_ids_parse() {
        let id = CollectionId::parse(SCOPED).unwrap();
        match id {
            CollectionId::Scoped(scoped) => {
                assert_eq!(scoped.cluster(), "zzzzz");
                assert_eq!(scoped.suffix(), "znfnqtbbv4spc3w");
            }
            other => panic!("unexpected id {other:?}"),
        }
        assert_eq!(id.to_string(), SCOPED);
        assert!(id.as_uuid().is_none());
    }

    #[test]
    fn parse_rejects_other_forms() {
        assert!(CollectionId::parse("not-a-uuid").is_none());
        assert!(CollectionId::parse("0f4e9c1a6d1e4c559a573f0b8a3c2d11").is_none());
        assert!(CollectionId::parse("7a6ef4c162a5c6413070a8bd0bffc818+150").is_none());
        // Wrong object type infix.
        assert!(CollectionId::parse("zzzzz-j7d0g-znfnqtbbv4spc3w").is_none());
        assert!(CollectionId::parse("ZZZZZ-4zz18-znfnqtbbv4spc3w").is_none());
        assert!(CollectionId::parse("zzzzz-4zz18-znfnqtbbv4spc3").is_none());
        assert!("zzzzz_4zz18_znfnqtbbv4spc3w".parse::<CollectionId>().is_err());
    }

    #[test]
    fn serializes_as_text() {
        let id = CollectionId::parse(SCOPED).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SCOPED}\""));
        let back: CollectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let uuid = CollectionId::new();
        let back: CollectionId = serde_json::from_str(&serde_json::to_string(&uuid).unwrap()).unwrap();
        assert_eq!(back, uuid);
        assert!(serde_json::from_str::<CollectionId>("\"nope\"").is_err());
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(CollectionId::new(), CollectionId::new());
    }
}
