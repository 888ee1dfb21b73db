//! Domain types for the viewer.
//!
//! This module contains the core data structures:
//! - Content: identifiers and retrieved artifacts
//! - Media: classification of declared media types into renderer variants
//! - Fragment: typed deep-link state decoded from the URL fragment

pub mod content;
pub mod fragment;
pub mod media;

// Re-export commonly used types
pub use content::{ArtifactBody, ContentId, IdentifierError, RetrievedArtifact};
pub use fragment::{parse_fragment, ViewFragmentState};
pub use media::{classify, Classifier, MediaVariant};
