//! Plain-text rendition of a cleaned tree.
//!
//! Figure captions are excluded from the text output; the remaining tree is
//! rendered with a layout-guessing extractor that separates block elements
//! with blank lines. A caller-supplied extractor receives the same
//! caption-stripped copy.

use crate::etree::{Document, NodeId};
use crate::tags;

/// Render the cleaned tree as plain text using the default extractor.
#[must_use]
pub fn cleaned_node_to_text(doc: &Document) -> String {
    cleaned_node_to_text_with(doc, extract_text)
}

/// Render the cleaned tree as plain text with a custom extractor.
pub fn cleaned_node_to_text_with<F>(doc: &Document, text_extractor: F) -> String
where
    F: Fn(&Document) -> String,
{
    let mut copy = doc.clone();
    apply_text_exclusions(&mut copy);
    text_extractor(&copy)
}

/// Exclusions that only apply to the plain-text output.
fn apply_text_exclusions(doc: &mut Document) {
    // Figure captions pollute the running text. The root itself is never
    // excluded.
    for caption in doc.find_all(doc.root(), "figcaption") {
        doc.drop_tree(caption);
    }
}

/// Default layout-guessing extractor: block elements are separated by a
/// blank line, `br` breaks the line, whitespace is collapsed per line.
#[must_use]
pub fn extract_text(doc: &Document) -> String {
    let mut raw = String::new();
    emit(doc, doc.root(), &mut raw);
    normalize_layout(&raw)
}

fn emit(doc: &Document, node: NodeId, out: &mut String) {
    let tag = doc.tag(node);
    let is_block = !tags::is_phrasing_content(tag);
    if is_block {
        out.push_str("\n\n");
    } else if tag == "br" {
        out.push('\n');
    }
    if let Some(text) = doc.text(node) {
        out.push_str(text);
    }
    for &child in doc.children(node) {
        emit(doc, child, out);
        if let Some(tail) = doc.tail(child) {
            out.push_str(tail);
        }
    }
    if is_block {
        out.push_str("\n\n");
    }
}

fn normalize_layout(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;
    for line in raw.split('\n') {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(collapsed);
            previous_blank = false;
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}
