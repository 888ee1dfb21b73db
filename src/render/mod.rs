//! Renderer dispatch.
//!
//! A classified artifact is first turned into a [`Renderable`], which owns
//! exactly the data its renderer needs (a reference URL, parsed Markdown, or
//! listing text). [`render`] is then a total match over that type: each
//! variant has one branch and no branch can see another variant's data.
//!
//! Renderers never see content identifiers or fetch state.

pub mod code;
pub mod markdown;
pub mod page;

use maud::{html, Markup};

use crate::domain::{ArtifactBody, MediaVariant, RetrievedArtifact, ViewFragmentState};
use crate::frontmatter::{extract_frontmatter, MarkdownDocument};

pub use code::{CodeLine, CodeListing};
pub use page::{document, render_state, render_view_page};

/// Placeholder shown for content that cannot be displayed as text
pub const BINARY_PLACEHOLDER: &str = "Cannot display binary content.";

/// Artifact content prepared for one renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderable {
    Image { url: String, alt: String },
    Video { url: String },
    Document { url: String },
    Markdown(MarkdownDocument),
    Code { language: String, text: String },
    /// Unclassified content; `None` when no text could be read
    Unknown { text: Option<String> },
}

impl Renderable {
    /// Build the renderer input for a classified artifact.
    ///
    /// Front-matter extraction runs here, and only for Markdown. Text
    /// variants without a readable body fall back to the binary placeholder.
    pub fn prepare(variant: MediaVariant, artifact: &RetrievedArtifact) -> Self {
        let text = artifact.body.text();

        match variant {
            MediaVariant::Image => Renderable::Image {
                url: artifact.url.clone(),
                alt: artifact.filename.clone().unwrap_or_default(),
            },
            MediaVariant::Video => Renderable::Video {
                url: artifact.url.clone(),
            },
            MediaVariant::Document => Renderable::Document {
                url: artifact.url.clone(),
            },
            MediaVariant::Markdown => match text {
                Some(text) => Renderable::Markdown(extract_frontmatter(text)),
                None => Renderable::Unknown { text: None },
            },
            MediaVariant::Code { language } => match text {
                Some(text) => Renderable::Code {
                    language,
                    text: text.to_string(),
                },
                None => Renderable::Unknown { text: None },
            },
            MediaVariant::Unknown => Renderable::Unknown {
                text: match &artifact.body {
                    ArtifactBody::Text(text) => Some(text.clone()),
                    ArtifactBody::Binary | ArtifactBody::Streamed => None,
                },
            },
        }
    }

    /// Name of the renderer this content is routed to
    pub fn kind(&self) -> &'static str {
        match self {
            Renderable::Image { .. } => "image",
            Renderable::Video { .. } => "video",
            Renderable::Document { .. } => "pdf",
            Renderable::Markdown(_) => "markdown",
            Renderable::Code { .. } => "code",
            Renderable::Unknown { .. } => "unknown",
        }
    }
}

/// Render prepared content.
///
/// `raw_fragment` is the fragment text exactly as it appeared in the URL.
/// Video and PDF embeds receive it verbatim so the player or PDF viewer
/// interprets `t=` and `page=` itself; only code listings consume the
/// parsed `fragment`.
pub fn render(content: &Renderable, fragment: &ViewFragmentState, raw_fragment: &str) -> Markup {
    match content {
        Renderable::Image { url, alt } => html! {
            img.media src=(url) alt=(alt);
        },
        Renderable::Video { url } => html! {
            video.media src=(with_fragment(url, raw_fragment)) controls {}
        },
        Renderable::Document { url } => html! {
            object.pdf data=(with_fragment(url, raw_fragment)) type="application/pdf" width="100%" height="1000px" {
                p {
                    "This browser does not support PDFs. Please download the PDF to view it: "
                    a href=(url) { "Download PDF" }
                }
            }
        },
        Renderable::Markdown(doc) => markdown::render_markdown(doc),
        Renderable::Code { language, text } => CodeListing::new(text, language, fragment).render(),
        Renderable::Unknown { text: Some(text) } => html! {
            pre.plain { (text) }
        },
        Renderable::Unknown { text: None } => html! {
            pre.plain { (BINARY_PLACEHOLDER) }
        },
    }
}

/// Append the raw fragment to a reference URL, if there is one
fn with_fragment(url: &str, raw_fragment: &str) -> String {
    if raw_fragment.is_empty() {
        url.to_string()
    } else {
        format!("{}#{}", url, raw_fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://127.0.0.1:8964/api/md5?hash=d41d8cd98f00b204e9800998ecf8427e";

    fn artifact(content_type: &str, filename: Option<&str>, body: ArtifactBody) -> RetrievedArtifact {
        RetrievedArtifact::new(content_type, filename.map(String::from), URL, body)
    }

    #[test]
    fn test_prepare_routes_by_variant() {
        let image = Renderable::prepare(
            MediaVariant::Image,
            &artifact("image/png", Some("cat.png"), ArtifactBody::Streamed),
        );
        assert_eq!(
            image,
            Renderable::Image {
                url: URL.to_string(),
                alt: "cat.png".to_string()
            }
        );

        let code = Renderable::prepare(
            MediaVariant::Code {
                language: "go".to_string(),
            },
            &artifact("text/plain", Some("x.go"), ArtifactBody::Text("package main\n".into())),
        );
        assert_eq!(code.kind(), "code");

        let unknown = Renderable::prepare(
            MediaVariant::Unknown,
            &artifact("application/octet-stream", None, ArtifactBody::Binary),
        );
        assert_eq!(unknown, Renderable::Unknown { text: None });
    }

    #[test]
    fn test_prepare_markdown_extracts_frontmatter() {
        let md = Renderable::prepare(
            MediaVariant::Markdown,
            &artifact(
                "text/markdown; charset=utf-8",
                Some("notes.md"),
                ArtifactBody::Text("---\ntitle: Notes\n---\n# Hello\n".into()),
            ),
        );
        let Renderable::Markdown(doc) = md else {
            panic!("expected markdown, got {:?}", md);
        };
        assert_eq!(doc.frontmatter.len(), 1);
        assert_eq!(doc.body, "# Hello\n");
    }

    #[test]
    fn test_video_forwards_raw_fragment() {
        let video = Renderable::Video { url: URL.to_string() };
        let fragment = ViewFragmentState::parse("t=1m30s");
        let html = render(&video, &fragment, "t=1m30s").into_string();
        assert!(html.contains(&format!("src=\"{}#t=1m30s\"", URL)));
        assert!(html.contains("controls"));
    }

    #[test]
    fn test_video_without_fragment() {
        let video = Renderable::Video { url: URL.to_string() };
        let html = render(&video, &ViewFragmentState::None, "").into_string();
        assert!(html.contains(&format!("src=\"{}\"", URL)));
        assert!(!html.contains('#'));
    }

    #[test]
    fn test_document_forwards_unparsed_fragment() {
        // Forwarded even when it does not parse
        let pdf = Renderable::Document { url: URL.to_string() };
        let html = render(&pdf, &ViewFragmentState::None, "zoom=200").into_string();
        assert!(html.contains(&format!("data=\"{}#zoom=200\"", URL)));
        assert!(html.contains("type=\"application/pdf\""));
        assert!(html.contains("Download PDF"));
    }

    #[test]
    fn test_image_ignores_fragment() {
        let image = Renderable::Image {
            url: URL.to_string(),
            alt: "cat.png".to_string(),
        };
        let html = render(&image, &ViewFragmentState::parse("L3"), "L3").into_string();
        assert!(html.contains(&format!("src=\"{}\"", URL)));
        assert!(html.contains("alt=\"cat.png\""));
        assert!(!html.contains("#L3"));
    }

    #[test]
    fn test_unknown_text_and_placeholder() {
        let text = Renderable::Unknown {
            text: Some("<raw & plain>".to_string()),
        };
        let html = render(&text, &ViewFragmentState::None, "").into_string();
        assert!(html.contains("&lt;raw &amp; plain&gt;"));

        let binary = Renderable::Unknown { text: None };
        let html = render(&binary, &ViewFragmentState::None, "").into_string();
        assert!(html.contains(BINARY_PLACEHOLDER));
    }

    #[test]
    fn test_text_variant_without_text_body_shows_placeholder() {
        let code = Renderable::prepare(
            MediaVariant::Code {
                language: "text".to_string(),
            },
            &artifact("text/plain", Some("notes.txt"), ArtifactBody::Binary),
        );
        assert_eq!(code, Renderable::Unknown { text: None });

        let html = render(&code, &ViewFragmentState::None, "").into_string();
        assert!(html.contains(BINARY_PLACEHOLDER));
    }

    #[test]
    fn test_code_with_nul_renders_every_line() {
        let code = Renderable::prepare(
            MediaVariant::Code {
                language: "text".to_string(),
            },
            &artifact(
                "text/plain",
                None,
                ArtifactBody::Text("line one\nline\0two\nline three\n".to_string()),
            ),
        );
        let html = render(&code, &ViewFragmentState::None, "").into_string();
        assert!(html.contains("line one"));
        assert!(html.contains("line three"));
        assert_eq!(html.matches("class=\"line\"").count(), 3);
    }
}
