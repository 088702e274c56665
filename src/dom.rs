//! Parsing adapter bridging the `dom_query` (html5ever) parse tree into the
//! text/tail element tree.
//!
//! The parser is HTML5-tolerant and normalizes tag casing; this module only
//! reshapes its output: element nodes become arena elements, character data
//! is split into the text/tail model, and everything else (comments,
//! processing instructions, doctypes) is discarded.

use dom_query::Document as ParsedDocument;
use tendril::StrTendril;

use crate::etree::{Document, NodeId};

/// Parse an HTML fragment into an element tree.
///
/// The fragment is parsed as the content of `<body>`. When the body holds a
/// single element surrounded by nothing but whitespace, that element is the
/// root of the returned tree; otherwise a `<div>` root wraps the body
/// content. The returned tree never shares state with the parser.
#[must_use]
pub fn parse_fragment(html: &str) -> Document {
    let parsed = ParsedDocument::from(html);
    let mut doc = Document::new("div");
    let container = doc.root();

    let body = parsed.select("body");
    if let Some(body_node) = body.nodes().first() {
        convert_children(&mut doc, container, body_node);
    }
    promote_single_element(doc)
}

fn convert_children(doc: &mut Document, parent: NodeId, node: &dom_query::NodeRef) {
    let mut last_child: Option<NodeId> = None;
    for child in node.children() {
        if child.is_element() {
            let Some(name) = child.node_name() else { continue };
            let element = doc.new_element(&name.to_lowercase());
            for attr in child.attrs().iter() {
                doc.set_attr(element, &attr.name.local, &attr.value);
            }
            doc.append(parent, element);
            convert_children(doc, element, &child);
            last_child = Some(element);
        } else if child.is_text() {
            let piece: StrTendril = child.text();
            match last_child {
                None => doc.append_to_text(parent, &piece),
                Some(previous) => doc.append_to_tail(previous, &piece),
            }
        }
    }
}

/// Collapse the synthetic `<div>` container when the fragment was a single
/// element with only whitespace around it.
fn promote_single_element(mut doc: Document) -> Document {
    let container = doc.root();
    let children = doc.children(container).to_vec();
    if children.len() == 1 {
        let only = children[0];
        let surrounded_by_whitespace = !doc.has_text(container) && !doc.has_tail(only);
        if surrounded_by_whitespace {
            doc.set_tail(only, None);
            doc.set_root(only);
        }
    }
    doc
}
