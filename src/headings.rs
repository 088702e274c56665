//! Heading level normalization.

use std::collections::HashSet;

use crate::etree::{Document, NodeId};

/// All heading elements below `root`, in document order.
#[must_use]
pub fn headings_nodes(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.iter(root)
        .into_iter()
        .skip(1)
        .filter(|&node| heading_level(doc.tag(node)).is_some())
        .collect()
}

/// The minimum heading level in the document, defaulting to 1.
#[must_use]
pub fn min_heading(doc: &Document, root: NodeId) -> u32 {
    headings_nodes(doc, root)
        .into_iter()
        .filter_map(|node| heading_level(doc.tag(node)))
        .min()
        .unwrap_or(1)
}

/// Normalize headings so that the lowest level is always 2. An `h6` is
/// replaced by `<p><strong>...</strong></p>`. Nodes in the white list are
/// ignored.
pub fn normalize_headings_level(doc: &mut Document, root: NodeId, white_list: &HashSet<NodeId>) {
    let root_level = min_heading(doc, root);
    for heading in headings_nodes(doc, root) {
        if white_list.contains(&heading) {
            continue;
        }
        if doc.tag(heading) == "h6" {
            // The deepest heading has nowhere to shift to.
            doc.set_tag(heading, "p");
            doc.wrap_element_content_with_tag(heading, "strong");
        } else if let Some(level) = heading_level(doc.tag(heading)) {
            doc.set_tag(heading, &format!("h{}", level - root_level + 2));
        }
    }
}

fn heading_level(tag: &str) -> Option<u32> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
