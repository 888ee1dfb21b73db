//! Line-numbered code listings.

use maud::{html, Markup};

use crate::domain::ViewFragmentState;

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub text: &'a str,
    pub highlighted: bool,
}

/// A listing with line numbers and an optional highlighted range
#[derive(Debug, Clone)]
pub struct CodeListing<'a> {
    language: &'a str,
    lines: Vec<CodeLine<'a>>,
}

impl<'a> CodeListing<'a> {
    pub fn new(text: &'a str, language: &'a str, fragment: &ViewFragmentState) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| CodeLine {
                number: idx + 1,
                text: line,
                highlighted: fragment.highlights(idx + 1),
            })
            .collect();

        Self { language, lines }
    }

    pub fn lines(&self) -> &[CodeLine<'a>] {
        &self.lines
    }

    /// Line numbers that carry the highlight
    pub fn highlighted(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|line| line.highlighted)
            .map(|line| line.number)
            .collect()
    }

    pub fn render(&self) -> Markup {
        html! {
            div.code-listing data-language=(self.language) {
                table {
                    tbody {
                        @for line in &self.lines {
                            tr.line.highlighted[line.highlighted] id={ "L" (line.number) } data-line=(line.number) {
                                td.line-number { a href={ "#L" (line.number) } { (line.number) } }
                                td.line-text {
                                    code class={ "language-" (self.language) } { (line.text) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_lines() -> String {
        (1..=10).map(|n| format!("line {}\n", n)).collect()
    }

    #[test]
    fn test_range_highlights_only_inside_lines() {
        let text = ten_lines();
        let listing = CodeListing::new(&text, "go", &ViewFragmentState::LineRange { start: 3, end: 5 });
        assert_eq!(listing.lines().len(), 10);
        assert_eq!(listing.highlighted(), vec![3, 4, 5]);
    }

    #[test]
    fn test_single_line_highlight() {
        let text = ten_lines();
        let listing = CodeListing::new(&text, "go", &ViewFragmentState::LineRange { start: 1, end: 1 });
        assert_eq!(listing.highlighted(), vec![1]);
    }

    #[test]
    fn test_range_past_end_is_clamped_by_content() {
        let listing = CodeListing::new("a\nb\n", "text", &ViewFragmentState::LineRange { start: 2, end: 40 });
        assert_eq!(listing.highlighted(), vec![2]);
    }

    #[test]
    fn test_other_fragments_highlight_nothing() {
        let text = ten_lines();
        for fragment in [
            ViewFragmentState::None,
            ViewFragmentState::PageNumber { page: 3 },
            ViewFragmentState::SeekTime {
                offset: "3".to_string(),
            },
        ] {
            assert!(CodeListing::new(&text, "go", &fragment).highlighted().is_empty());
        }
    }

    #[test]
    fn test_render_numbers_every_line() {
        let listing = CodeListing::new("fn a() {}\nfn b() {}\n", "rust", &ViewFragmentState::None);
        let html = listing.render().into_string();

        assert!(html.contains("id=\"L1\""));
        assert!(html.contains("id=\"L2\""));
        assert!(html.contains("href=\"#L2\""));
        assert!(html.contains("class=\"language-rust\""));
        assert!(!html.contains("highlighted"));
    }

    #[test]
    fn test_render_marks_highlighted_rows() {
        let text = ten_lines();
        let listing = CodeListing::new(&text, "go", &ViewFragmentState::LineRange { start: 3, end: 5 });
        let html = listing.render().into_string();
        assert_eq!(html.matches("class=\"line highlighted\"").count(), 3);
        assert_eq!(html.matches("class=\"line\"").count(), 7);
    }

    #[test]
    fn test_render_escapes_source() {
        let listing = CodeListing::new("if a < b && c > d {}", "js", &ViewFragmentState::None);
        let html = listing.render().into_string();
        assert!(html.contains("if a &lt; b &amp;&amp; c &gt; d {}"));
    }
}
