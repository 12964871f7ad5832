//! Error types for the manifest crate.

use thiserror::Error;

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors that can occur while decoding or encoding manifest text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// A manifest line violates the stream grammar.
    #[error("malformed manifest at line {line}: {message}")]
    Malformed {
        /// 1-based line number in the manifest text.
        line: usize,
        /// Description of the violation.
        message: String,
    },

    /// A token is not a valid block locator.
    #[error("invalid locator {token:?}: {reason}")]
    InvalidLocator {
        /// The offending token.
        token: String,
        /// Why the token was rejected.
        reason: &'static str,
    },

    /// A token is not a valid file segment.
    #[error("invalid file segment {token:?}: {reason}")]
    InvalidSegment {
        /// The offending token.
        token: String,
        /// Why the token was rejected.
        reason: &'static str,
    },

    /// A name contains a broken `\ooo` escape or decodes to invalid UTF-8.
    #[error("invalid escape sequence in {text:?}")]
    InvalidEscape {
        /// The raw escaped text.
        text: String,
    },

    /// A stream cannot be written as a manifest line.
    #[error("stream {path:?} cannot be encoded: {reason}")]
    Unencodable {
        /// Path of the stream.
        path: String,
        /// Why the stream is not encodable.
        reason: String,
    },
}

impl ManifestError {
    /// Creates a malformed-manifest error for the given line.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid locator error.
    pub fn invalid_locator(token: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidLocator {
            token: token.into(),
            reason,
        }
    }

    /// Creates an invalid segment error.
    pub fn invalid_segment(token: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSegment {
            token: token.into(),
            reason,
        }
    }

    /// Creates an unencodable stream error.
    pub fn unencodable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unencodable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attaches a line number, turning token-level errors into
    /// [`ManifestError::Malformed`]. Line 0 means "not yet known".
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::Malformed { line: 0, message } => Self::Malformed { line, message },
            Self::Malformed { .. } => self,
            other => Self::malformed(line, other.to_string()),
        }
    }
}
