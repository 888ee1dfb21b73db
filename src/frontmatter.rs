//! Front-matter extraction for Markdown artifacts.
//!
//! A metadata block sits at the very start of the text, fenced by `---`
//! lines, and holds YAML key/value pairs:
//!
//! ```text
//! ---
//! title: Notes
//! tags: [rust, viewer]
//! ---
//! # Body starts here
//! ```
//!
//! Extraction never fails. A block that does not parse as a YAML mapping is
//! treated as absent and the text is returned untouched.

use serde_yaml::Value;

/// Fence line opening and closing the metadata block
pub const DELIMITER: &str = "---";

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
    /// Nested mapping, kept as compact YAML
    Nested(String),
}

/// Ordered key/value metadata from the head of a Markdown document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, FrontmatterValue)>,
}

impl Frontmatter {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn from_mapping(mapping: serde_yaml::Mapping) -> Self {
        let entries = mapping
            .into_iter()
            .map(|(key, value)| (scalar_text(&key), FrontmatterValue::from(value)))
            .collect();
        Self { entries }
    }
}

impl From<Value> for FrontmatterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Sequence(items) => FrontmatterValue::List(items.iter().map(scalar_text).collect()),
            Value::Mapping(mapping) => {
                FrontmatterValue::Nested(compact_yaml(&Value::Mapping(mapping)))
            }
            Value::Tagged(tagged) => FrontmatterValue::from(tagged.value),
            scalar => FrontmatterValue::Scalar(scalar_text(&scalar)),
        }
    }
}

/// Markdown split into metadata and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Split leading front-matter from Markdown text
pub fn extract_frontmatter(text: &str) -> MarkdownDocument {
    let unchanged = || MarkdownDocument {
        frontmatter: Frontmatter::default(),
        body: text.to_string(),
    };

    let Some((yaml, body)) = split_block(text) else {
        return unchanged();
    };

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => MarkdownDocument {
            frontmatter: Frontmatter::from_mapping(mapping),
            body: body.to_string(),
        },
        Ok(Value::Null) => MarkdownDocument {
            frontmatter: Frontmatter::default(),
            body: body.to_string(),
        },
        Ok(other) => {
            tracing::warn!(kind = value_kind(&other), "Front-matter is not a mapping, ignoring");
            unchanged()
        }
        Err(e) => {
            tracing::warn!("Failed to parse front-matter, ignoring: {}", e);
            unchanged()
        }
    }
}

/// Locate the fenced block. Returns (yaml, body) when both fences exist.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let (first, mut rest) = next_line(text)?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = text.len() - rest.len();
    loop {
        let line_start = text.len() - rest.len();
        let (line, after) = next_line(rest)?;
        if line.trim_end() == DELIMITER {
            return Some((&text[yaml_start..line_start], after));
        }
        rest = after;
    }
}

/// Split off one line, without its terminator. `None` at end of input.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(idx) => Some((text[..idx].trim_end_matches('\r'), &text[idx + 1..])),
        None => Some((text, "")),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => compact_yaml(value),
    }
}

fn compact_yaml(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
