//! Content identifiers and retrieved artifacts.
//!
//! An artifact is addressed by the MD5 of its bytes. The viewer never
//! generates identifiers for remote content; it only validates the ones it
//! is handed and passes them through to the content endpoint.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a hex-encoded MD5 digest
pub const CONTENT_ID_LEN: usize = 32;

/// Errors for identifiers that cannot address any artifact
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("No hash provided in the URL.")]
    Missing,

    #[error("Invalid MD5 hash: expected {CONTENT_ID_LEN} characters, got {0}")]
    InvalidLength(usize),

    #[error("Invalid MD5 hash: unexpected character {0:?}")]
    InvalidCharacter(char),
}

/// Content identifier (hex MD5 of the artifact bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(String);

impl ContentId {
    /// Validate a raw hash string
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IdentifierError::Missing);
        }

        let len = raw.chars().count();
        if len != CONTENT_ID_LEN {
            return Err(IdentifierError::InvalidLength(len));
        }

        if let Some(bad) = raw.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(IdentifierError::InvalidCharacter(bad));
        }

        Ok(Self(raw.to_string()))
    }

    /// Compute the identifier of a local file's bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContentId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Payload of a retrieved artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactBody {
    /// Body was read and decoded as text
    Text(String),

    /// Body was read but is not displayable text
    Binary,

    /// Body was left on the wire; renderers embed it by reference URL
    Streamed,
}

impl ArtifactBody {
    /// Text content, if any was loaded
    pub fn text(&self) -> Option<&str> {
        match self {
            ArtifactBody::Text(text) => Some(text),
            ArtifactBody::Binary | ArtifactBody::Streamed => None,
        }
    }
}

/// Result of a single fetch against the content endpoint
#[derive(Debug, Clone)]
pub struct RetrievedArtifact {
    /// Declared `Content-Type`, empty when the header was absent
    pub content_type: String,

    /// Filename carried in `Content-Disposition`
    pub filename: Option<String>,

    /// URL the artifact can be re-fetched or streamed from
    pub url: String,

    pub body: ArtifactBody,
}

impl RetrievedArtifact {
    pub fn new(
        content_type: impl Into<String>,
        filename: Option<String>,
        url: impl Into<String>,
        body: ArtifactBody,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            filename,
            url: url.into(),
            body,
        }
    }
}
