//! # clean-article-html
//!
//! Normalizes noisy article body HTML into a tight, presentation-ready
//! subset: a single `<article>` root, a small tag and attribute
//! vocabulary, paragraph-structured text, media wrapped in `<figure>`,
//! normalized heading levels, and provider embeds (Instagram, Twitter,
//! Facebook) preserved verbatim.
//!
//! ## Quick Start
//!
//! ```rust
//! let html = r#"<div style="color:blue"><div>paragraph1</div><div>paragraph2</div></div>"#;
//! let cleaned = clean_article_html::clean_html(html, None);
//! assert_eq!(
//!     cleaned,
//!     "<article>\n\n<p>paragraph1</p>\n\n<p>paragraph2</p>\n\n</article>"
//! );
//! ```
//!
//! The pipeline is total: any input produces an output tree, and no error
//! is surfaced for malformed markup. Cleaning never mutates the caller's
//! tree; [`clean_node`] works on an internal deep copy.

mod error;

/// Annotation corpus used by fixture tests.
pub mod annotations;

/// Allow-list sanitizer over the element tree.
pub mod cleaner;

/// Parsing adapter bridging the HTML5 parser into the element tree.
pub mod dom;

/// Detection of provider embeds preserved verbatim.
pub mod embeddings;

/// Character encoding detection for byte input.
pub mod encoding;

/// Element tree with lxml-style text/tail semantics.
pub mod etree;

/// Figure assembly passes.
pub mod figures;

/// Heading level normalization.
pub mod headings;

/// Tree rewriting passes shared by the pipeline.
pub mod html_processing;

/// The cleaning pipeline and paragraphizer.
pub mod pipeline;

/// HTML serialization of the element tree.
pub mod serialize;

/// Tag and attribute catalogs.
pub mod tags;

/// Plain-text rendition of a cleaned tree.
pub mod text;

/// Link absolutization.
pub mod url_utils;

// Public API - re-exports
pub use annotations::{BodyAnnotation, BodyAnnotations};
pub use error::{Error, Result};
pub use etree::{ChildrenSlice, Document, NodeId};
pub use text::{cleaned_node_to_text, cleaned_node_to_text_with};

use std::collections::HashSet;

/// Normalize the given tree. The result contains cleaned HTML with
/// embeds preserved. Works on a copy, so the original tree remains
/// untouched.
#[must_use]
pub fn clean_node(doc: &Document, base_url: Option<&str>) -> Document {
    let mut copy = doc.clone();
    let nodes_whitelist: HashSet<NodeId> = embeddings::integrate_embeddings(&mut copy, None);
    pipeline::clean_doc(&mut copy, base_url, &nodes_whitelist);
    copy
}

/// Serialize a cleaned tree as an HTML string (without the root's tail).
#[must_use]
pub fn cleaned_node_to_html(doc: &Document) -> String {
    serialize::node_to_html(doc, doc.root())
}

/// Clean an HTML fragment and return the normalized HTML string.
///
/// Relative URLs are resolved against `base_url` when given.
#[must_use]
pub fn clean_html(html: &str, base_url: Option<&str>) -> String {
    let doc = dom::parse_fragment(html);
    let cleaned = clean_node(&doc, base_url);
    cleaned_node_to_html(&cleaned)
}

/// Clean raw HTML bytes, detecting the character encoding from meta
/// declarations before parsing.
#[must_use]
pub fn clean_bytes(html: &[u8], base_url: Option<&str>) -> String {
    clean_html(&encoding::decode_html(html), base_url)
}
