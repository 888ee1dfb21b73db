//! HTTP content source.
//!
//! Resolves identifiers against the indexing client's content API:
//!
//! ```text
//! GET {base_url}{content_path}?hash={id}
//!   Content-Type: drives classification
//!   Content-Disposition: inline; filename="notes.md"
//! ```
//!
//! Image, video and PDF bodies are not downloaded here. The renderers embed
//! them by URL so the browser can stream and range-request them itself.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{ContentSource, FetchError};
use crate::config::ResolvedConfig;
use crate::domain::{classify, ArtifactBody, ContentId, MediaVariant, RetrievedArtifact};

/// Default path of the content API
pub const DEFAULT_CONTENT_PATH: &str = "/api/md5";

/// Health endpoint path
pub const HEALTH_PATH: &str = "/api/health";

/// Response from the health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub version: String,
}

/// Content source backed by the HTTP content API
pub struct HttpContentSource {
    /// Endpoint origin, e.g. `http://127.0.0.1:8964`
    base_url: String,
    /// Path of the content API
    content_path: String,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpContentSource {
    /// Create a new source with a request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            content_path: DEFAULT_CONTENT_PATH.to_string(),
            client,
        })
    }

    /// Override the content API path
    pub fn with_content_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.content_path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        Ok(Self::new(&config.endpoint, config.timeout())?.with_content_path(&config.content_path))
    }

    /// Query the endpoint's health API
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Health check failed ({}): {}", status, url);
        }

        response
            .json::<HealthStatus>()
            .await
            .context("Failed to parse health response")
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn name(&self) -> &str {
        "http"
    }

    fn content_url(&self, id: &ContentId) -> String {
        format!("{}{}?hash={}", self.base_url, self.content_path, id)
    }

    #[instrument(skip(self, id), fields(hash = %id))]
    async fn fetch(&self, id: &ContentId) -> Result<RetrievedArtifact, FetchError> {
        let url = self.content_url(id);
        info!(%url, "Fetching artifact");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.clone())
            } else {
                FetchError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let content_type = header_text(response.headers(), CONTENT_TYPE).unwrap_or_default();
        let filename = header_text(response.headers(), CONTENT_DISPOSITION)
            .as_deref()
            .and_then(disposition_filename);

        let variant = classify(&content_type, filename.as_deref());
        let body = if variant.loads_text() {
            let bytes = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.clone())
                } else {
                    FetchError::Network(e)
                }
            })?;
            decode_body(&bytes, &variant)
        } else {
            // Dropping the response closes the body stream unread
            ArtifactBody::Streamed
        };

        debug!(%content_type, ?filename, variant = variant.name(), "Artifact retrieved");
        Ok(RetrievedArtifact::new(content_type, filename, url, body))
    }
}

fn header_text(headers: &reqwest::header::HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Extract `filename="..."` from a `Content-Disposition` value
pub fn disposition_filename(disposition: &str) -> Option<String> {
    let start = disposition.find("filename=\"")? + "filename=\"".len();
    let rest = &disposition[start..];
    let end = rest.find('"')?;
    let name = &rest[..end];

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Decode a text body as lossy UTF-8.
///
/// Only unclassified content with NUL bytes is treated as binary. Code and
/// Markdown were declared as text, so a stray NUL never hides them.
pub fn decode_body(bytes: &[u8], variant: &MediaVariant) -> ArtifactBody {
    if *variant == MediaVariant::Unknown && bytes.contains(&0) {
        return ArtifactBody::Binary;
    }
    ArtifactBody::Text(String::from_utf8_lossy(bytes).into_owned())
}
