//! Standalone HTML page shell.

use maud::{html, Markup, DOCTYPE};

use crate::core::{View, ViewState};

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; padding: 1rem; color: #1f2328; }
.container { max-width: 72rem; margin: 0 auto; }
.media { display: block; max-width: 100%; height: auto; margin: 0 auto; }
pre.plain { white-space: pre-wrap; }
.frontmatter { margin-bottom: 1.5rem; padding: 1rem; border: 1px solid #d0d7de; border-radius: 0.5rem; background: #f6f8fa; }
.frontmatter dl { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 0.5rem 1rem; }
.frontmatter dt { font-size: 0.85rem; color: #59636e; }
.frontmatter dd { margin: 0.25rem 0 0; }
.pill { display: inline-block; margin: 0 0.5rem 0.5rem 0; padding: 0.2rem 0.75rem; border-radius: 999px; background: #e6e9ed; font-size: 0.85rem; font-weight: 600; }
.code-listing { overflow-x: auto; font-family: ui-monospace, monospace; font-size: 0.875rem; }
.code-listing table { border-collapse: collapse; width: 100%; }
.line-number { padding: 0 1rem 0 0.5rem; text-align: right; color: #8c959f; user-select: none; }
.line-number a { color: inherit; text-decoration: none; }
.line-text code { white-space: pre; }
tr.highlighted { background: rgba(255, 214, 0, 0.25); }
.error { color: #cf222e; }
"#;

/// Wrap rendered content in a complete HTML document
pub fn document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                div.container {
                    (content)
                }
            }
        }
    }
}

/// Render a ready view as a full page
pub fn render_view_page(view: &View) -> Markup {
    document(&view.title(), view.render())
}

/// Render any controller state as a full page
pub fn render_state(state: &ViewState) -> Markup {
    match state {
        ViewState::Loading => document("Loading", html! { div.loading { "Loading..." } }),
        ViewState::Error(message) => document(
            "Error",
            html! { div.error { "Error: " (message) } },
        ),
        ViewState::Ready(view) => render_view_page(view),
    }
}
