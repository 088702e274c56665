//! HTML serialization of the element tree.
//!
//! Void elements serialize without a closing tag; empty allowed containers
//! serialize as `<tag></tag>`, never self-closing. Attribute order is the
//! insertion order recorded on the node.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::etree::{Document, NodeId};

/// Void elements cannot have children and don't need closing tags.
static VOID_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Serialize the subtree rooted at `node`, without the node's tail.
#[must_use]
pub fn node_to_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    push_element(doc, node, &mut out);
    out
}

fn push_element(doc: &Document, node: NodeId, out: &mut String) {
    let tag = doc.tag(node);
    out.push('<');
    out.push_str(tag);
    for (name, value) in doc.attrs(node) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        push_escaped_attr(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(tag) && doc.children(node).is_empty() && doc.text(node).is_none() {
        return;
    }

    if let Some(text) = doc.text(node) {
        push_escaped_text(text, out);
    }
    for &child in doc.children(node) {
        push_element(doc, child, out);
        if let Some(tail) = doc.tail(child) {
            push_escaped_text(tail, out);
        }
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
