//! Detection of provider embeds that must survive cleaning untouched.
//!
//! Embeds are recognized by well-known CSS class names. The returned
//! whitelist contains the matched nodes and every descendant; passes that
//! mutate tags, attributes or tree shape skip whitelisted nodes, so the
//! embed markup reaches the output verbatim.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::etree::{Document, NodeId};

pub static INSTAGRAM_CLASSES: [&str; 1] = ["instagram-media"];
pub static TWITTER_CLASSES: [&str; 3] = ["twitter-tweet", "twitter-timeline", "twitter-moment"];
pub static FACEBOOK_CLASSES: [&str; 3] = ["fb-post", "fb-video", "fb-comment-embed"];

/// Every class name that whitelists an element.
pub static ALL_WHITELISTING_CLASSES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    INSTAGRAM_CLASSES
        .into_iter()
        .chain(TWITTER_CLASSES)
        .chain(FACEBOOK_CLASSES)
        .collect()
});

/// Collect all embeds found in the document and return the set of nodes to
/// preserve as-is during cleanup (each matched element plus its whole
/// subtree). The optional `preprocessor` runs on every matched element
/// before the subtree closure is taken, as a hook for provider-specific
/// fixups.
pub fn integrate_embeddings(
    doc: &mut Document,
    preprocessor: Option<&mut dyn FnMut(&mut Document, NodeId)>,
) -> HashSet<NodeId> {
    let matched = nodes_for_classes(doc, &ALL_WHITELISTING_CLASSES);
    if let Some(preprocessor) = preprocessor {
        for &node in &matched {
            preprocessor(doc, node);
        }
    }
    include_subtrees(doc, &matched)
}

/// Nodes having at least one of the given classes.
fn nodes_for_classes(doc: &Document, classes: &HashSet<&'static str>) -> Vec<NodeId> {
    doc.iter(doc.root())
        .into_iter()
        .filter(|&node| {
            doc.attr(node, "class")
                .is_some_and(|value| value.split_whitespace().any(|c| classes.contains(c)))
        })
        .collect()
}

/// Expand each node to its inclusive subtree.
fn include_subtrees(doc: &Document, nodes: &[NodeId]) -> HashSet<NodeId> {
    let mut out = HashSet::new();
    for &node in nodes {
        out.extend(doc.iter(node));
    }
    out
}
