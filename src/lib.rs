//! hashview - content-addressed artifact viewer
//!
//! Given a content hash, hashview retrieves the artifact from the content
//! endpoint, classifies it by declared media type, and renders it with a
//! presentation suited to that type. Deep-link state in the URL fragment
//! (a line range, a video timestamp, a PDF page) is parsed and fed into the
//! matching renderer.
//!
//! # Architecture
//!
//! The view pipeline is:
//! - Parse the fragment once into a typed `ViewFragmentState`
//! - Fetch the artifact through a `ContentSource`
//! - Classify the declared content type into a `MediaVariant`
//! - Prepare a `Renderable` (front-matter is extracted for Markdown here)
//! - Dispatch to exactly one renderer
//!
//! # Modules
//!
//! - `adapters`: Content sources (HTTP content API)
//! - `core`: View controller and its observable state
//! - `domain`: Data structures (ContentId, MediaVariant, ViewFragmentState)
//! - `frontmatter`: Metadata extraction for Markdown
//! - `render`: Renderer dispatch and HTML output
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Render a code file with lines 10-20 highlighted
//! hashview view 9e107d9d372bb6826bd81d3542a419d6 --fragment L10-L20 -o view.html
//!
//! # Compute the hash of a local file
//! hashview hash ./notes.md
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod frontmatter;
pub mod render;

// Re-export main types at crate root for convenience
pub use adapters::{ContentSource, FetchError, HttpContentSource};
pub use core::{View, ViewController, ViewState};
pub use domain::{
    classify, parse_fragment, ArtifactBody, Classifier, ContentId, MediaVariant, RetrievedArtifact,
    ViewFragmentState,
};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterValue, MarkdownDocument};
pub use render::{render, Renderable};
