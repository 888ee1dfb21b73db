//! Adapter interfaces for the content endpoint.
//!
//! The viewer never resolves identifiers itself. A [`ContentSource`] turns a
//! [`ContentId`] into a [`RetrievedArtifact`]; the HTTP implementation talks
//! to the indexing client's content API.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ContentId, RetrievedArtifact};

// Re-export the HTTP source
pub use http::{HealthStatus, HttpContentSource};

/// Errors that can occur while fetching an artifact
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16, url: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// Transport status, when the endpoint answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Timeout(_) | FetchError::Network(_) => None,
        }
    }
}

/// Trait for content resolution backends
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// URL the artifact is served from, used for by-reference embedding
    fn content_url(&self, id: &ContentId) -> String;

    /// Fetch one artifact. Single-shot: no retry, no caching.
    async fn fetch(&self, id: &ContentId) -> Result<RetrievedArtifact, FetchError>;
}
