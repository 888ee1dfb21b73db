//! Markdown rendering with a front-matter metadata panel.

use maud::{html, Markup, PreEscaped};
use pulldown_cmark::{html as md_html, Event, Options, Parser};

use crate::frontmatter::{Frontmatter, FrontmatterValue, MarkdownDocument};

/// Render the metadata panel followed by the document body
pub fn render_markdown(doc: &MarkdownDocument) -> Markup {
    html! {
        article.prose {
            (render_frontmatter(&doc.frontmatter))
            (PreEscaped(markdown_to_html(&doc.body)))
        }
    }
}

/// Metadata panel; empty front-matter renders nothing
pub fn render_frontmatter(frontmatter: &Frontmatter) -> Markup {
    html! {
        @if !frontmatter.is_empty() {
            div.frontmatter {
                h2 { "Metadata" }
                dl {
                    @for (key, value) in frontmatter.iter() {
                        div.entry {
                            dt { (key) }
                            dd {
                                @match value {
                                    FrontmatterValue::List(items) => {
                                        @for item in items {
                                            span.pill { (item) }
                                        }
                                    }
                                    FrontmatterValue::Nested(yaml) => {
                                        pre { (yaml) }
                                    }
                                    FrontmatterValue::Scalar(text) => {
                                        (text)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Convert Markdown to HTML with GFM-style extensions.
///
/// Raw HTML in the source is emitted as escaped text, never as markup.
pub fn markdown_to_html(body: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;

    let parser = Parser::new_ext(body, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        other => other,
    });
    let mut out = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::extract_frontmatter;

    #[test]
    fn test_metadata_panel_precedes_body() {
        let doc = extract_frontmatter("---\ntitle: Notes\ntags: [a, b]\n---\n# Hello\n");
        let html = render_markdown(&doc).into_string();

        let panel = html.find("Metadata").unwrap();
        let heading = html.find("<h1>Hello</h1>").unwrap();
        assert!(panel < heading);
        assert!(html.contains("<dt>title</dt>"));
        assert!(html.contains("<dd>Notes</dd>"));
        assert_eq!(html.matches("class=\"pill\"").count(), 2);
    }

    #[test]
    fn test_empty_frontmatter_omits_panel() {
        let doc = extract_frontmatter("# Plain\n");
        let html = render_markdown(&doc).into_string();
        assert!(!html.contains("Metadata"));
        assert!(!html.contains("frontmatter"));
        assert!(html.contains("<h1>Plain</h1>"));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_metadata_values_are_escaped() {
        let doc = extract_frontmatter("---\ntitle: \"<b>bold</b>\"\n---\nBody\n");
        let html = render_frontmatter(&doc.frontmatter).into_string();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let doc = extract_frontmatter(
            "# Hi\n\n<script>alert(1)</script>\n\nInline <b onclick=x()>tag</b>\n\n<img src=x onerror=alert(2)>\n",
        );
        let html = render_markdown(&doc).into_string();

        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b onclick=x()&gt;tag&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<b "));
    }
}
