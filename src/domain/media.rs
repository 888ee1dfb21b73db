//! Media classification.
//!
//! Maps a declared `Content-Type` onto the closed set of renderer variants.
//! Classification is total: anything no rule claims is `Unknown`.

use std::collections::HashMap;

use serde::Serialize;

/// Display language used when a filename carries no extension
pub const DEFAULT_LANGUAGE: &str = "text";

/// Renderer variant selected for an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaVariant {
    Image,
    Video,
    /// PDF document
    Document,
    Markdown,
    /// Plain text listing, with a best-effort display language
    Code { language: String },
    Unknown,
}

impl MediaVariant {
    /// Whether the body must be loaded as text before rendering.
    ///
    /// Image, video and document variants are embedded by reference URL and
    /// never read into memory.
    pub fn loads_text(&self) -> bool {
        match self {
            MediaVariant::Image | MediaVariant::Video | MediaVariant::Document => false,
            MediaVariant::Markdown | MediaVariant::Code { .. } | MediaVariant::Unknown => true,
        }
    }

    /// Short lowercase name for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            MediaVariant::Image => "image",
            MediaVariant::Video => "video",
            MediaVariant::Document => "pdf",
            MediaVariant::Markdown => "markdown",
            MediaVariant::Code { .. } => "code",
            MediaVariant::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaVariant::Code { language } => write!(f, "code ({})", language),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Built-in extension to language table
const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("go", "go"),
    ("java", "java"),
    ("html", "html"),
    ("css", "css"),
    ("rs", "rust"),
    ("sh", "bash"),
    ("yml", "yaml"),
];

/// Classifier with an extension to language table.
///
/// Extra mappings from configuration are layered over the built-in table.
#[derive(Debug, Clone)]
pub struct Classifier {
    languages: HashMap<String, String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Create a classifier with the built-in language table
    pub fn new() -> Self {
        let languages = BUILTIN_LANGUAGES
            .iter()
            .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
            .collect();
        Self { languages }
    }

    /// Add or override extension mappings
    pub fn with_languages<I, K, V>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (ext, lang) in extra {
            let ext: String = ext.into();
            self.languages
                .insert(ext.trim_start_matches('.').to_lowercase(), lang.into());
        }
        self
    }

    /// Classify a declared content type. First matching rule wins.
    pub fn classify(&self, content_type: &str, filename: Option<&str>) -> MediaVariant {
        let content_type = content_type.trim().to_ascii_lowercase();

        let variant = if content_type.starts_with("image/") {
            MediaVariant::Image
        } else if content_type.starts_with("video/") {
            MediaVariant::Video
        } else if content_type == "application/pdf" {
            MediaVariant::Document
        } else if content_type.contains("text/markdown") {
            MediaVariant::Markdown
        } else if content_type.starts_with("text/") {
            MediaVariant::Code {
                language: self.language_for(filename.unwrap_or_default()),
            }
        } else {
            MediaVariant::Unknown
        };

        tracing::debug!(%content_type, ?filename, variant = variant.name(), "Classified artifact");
        variant
    }

    /// Resolve a display language from a filename's extension.
    ///
    /// Unmapped extensions pass through verbatim; no extension yields
    /// [`DEFAULT_LANGUAGE`].
    pub fn language_for(&self, filename: &str) -> String {
        match extension(filename) {
            Some(ext) => self
                .languages
                .get(&ext.to_lowercase())
                .cloned()
                .unwrap_or_else(|| ext.to_string()),
            None => DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Classify with the built-in language table
pub fn classify(content_type: &str, filename: Option<&str>) -> MediaVariant {
    Classifier::new().classify(content_type, filename)
}

/// Extension after the last dot of the final path segment
fn extension(filename: &str) -> Option<&str> {
    let name = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}
