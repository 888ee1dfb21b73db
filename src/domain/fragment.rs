//! Deep-link fragment state.
//!
//! The URL fragment carries renderer sub-state without a server round-trip:
//!
//! ```text
//! t=<token>                   video seek time
//! page=<positive-integer>     document page
//! L<n> or L<n>-L<m>           code line or line range
//! ```
//!
//! Grammars are tried in that order and the first match wins. Anything else
//! parses to [`ViewFragmentState::None`]; parsing never fails.

use serde::Serialize;

/// Typed view sub-state decoded from a URL fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewFragmentState {
    /// Seek offset for video, forwarded verbatim to the player
    SeekTime { offset: String },

    /// 1-based document page
    PageNumber { page: u32 },

    /// Inclusive 1-based line range, `start <= end`
    LineRange { start: u32, end: u32 },

    None,
}

impl Default for ViewFragmentState {
    fn default() -> Self {
        Self::None
    }
}

impl ViewFragmentState {
    /// Parse a raw fragment (without the leading `#`)
    pub fn parse(raw: &str) -> Self {
        let state = parse_time(raw)
            .or_else(|| parse_page(raw))
            .or_else(|| parse_lines(raw))
            .unwrap_or(Self::None);

        if raw.is_empty() {
            tracing::trace!("No fragment");
        } else {
            tracing::debug!(fragment = raw, ?state, "Parsed view fragment");
        }
        state
    }

    /// Whether a 1-based line number falls inside the highlighted range
    pub fn highlights(&self, line: usize) -> bool {
        match self {
            Self::LineRange { start, end } => (*start as usize..=*end as usize).contains(&line),
            Self::SeekTime { .. } | Self::PageNumber { .. } | Self::None => false,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl std::fmt::Display for ViewFragmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SeekTime { offset } => write!(f, "t={}", offset),
            Self::PageNumber { page } => write!(f, "page={}", page),
            Self::LineRange { start, end } if start == end => write!(f, "L{}", start),
            Self::LineRange { start, end } => write!(f, "L{}-L{}", start, end),
            Self::None => Ok(()),
        }
    }
}

/// Parse a fragment string. Alias of [`ViewFragmentState::parse`].
pub fn parse_fragment(raw: &str) -> ViewFragmentState {
    ViewFragmentState::parse(raw)
}

/// `t=<token>`: any non-empty token without whitespace
fn parse_time(raw: &str) -> Option<ViewFragmentState> {
    let token = raw.strip_prefix("t=")?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(ViewFragmentState::SeekTime {
        offset: token.to_string(),
    })
}

/// `page=<digits>`, page numbers start at 1
fn parse_page(raw: &str) -> Option<ViewFragmentState> {
    let page = positive(raw.strip_prefix("page=")?)?;
    Some(ViewFragmentState::PageNumber { page })
}

/// `L<digits>` optionally followed by `-L<digits>`
fn parse_lines(raw: &str) -> Option<ViewFragmentState> {
    let rest = raw.strip_prefix('L')?;
    let (start, end) = match rest.split_once("-L") {
        Some((start, end)) => (positive(start)?, positive(end)?),
        None => {
            let start = positive(rest)?;
            (start, start)
        }
    };

    if end < start {
        return None;
    }
    Some(ViewFragmentState::LineRange { start, end })
}

/// Non-empty ASCII digits forming a number >= 1
fn positive(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|n| *n >= 1)
}
