//! Allow-list sanitizer over the element tree.
//!
//! Three stages run against a subtree: unsafe subtrees are killed
//! (scripts, styles, frames, head metadata), attributes are filtered down
//! to the allowed vocabulary plus `data-*`, and finally every element whose
//! tag is outside the allowed set is unwrapped with spacing preserved. The
//! subtree root is never removed; when its own tag is disallowed it is
//! renamed to `div` and stripped of attributes instead.
//!
//! Whitelisted nodes are ignored at every stage, both for element deletion
//! and attribute cleaning.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::etree::{Document, NodeId};
use crate::html_processing::drop_tag_preserve_spacing;
use crate::tags;

/// Tags removed together with their whole subtree.
static KILLED_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["script", "style", "link", "meta", "frame", "frameset", "noframes"]
        .into_iter()
        .collect()
});

/// Attributes whose value may carry a script URI.
static URI_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// The sanitizer configuration: which tags survive and which attributes
/// are safe.
pub struct BodyCleaner {
    allow_tags: &'static HashSet<&'static str>,
    safe_attrs: &'static HashSet<&'static str>,
    allow_data_attrs: bool,
}

impl BodyCleaner {
    /// Cleaner for the article body, using the full output vocabulary.
    #[must_use]
    pub fn body() -> Self {
        BodyCleaner {
            allow_tags: &tags::ALLOWED_TAGS,
            safe_attrs: &tags::ALLOWED_ATTRIBUTES,
            allow_data_attrs: true,
        }
    }

    /// Restricted cleaner applied inside figure captions.
    #[must_use]
    pub fn figure_caption() -> Self {
        BodyCleaner {
            allow_tags: &tags::FIGURE_CAPTION_ALLOWED_TAGS,
            safe_attrs: &tags::ALLOWED_ATTRIBUTES,
            allow_data_attrs: true,
        }
    }

    /// Clean the subtree rooted at `root` in place.
    pub fn clean(&self, doc: &mut Document, root: NodeId, nodes_whitelist: &HashSet<NodeId>) {
        kill_disallowed_subtrees(doc, root, nodes_whitelist, true);
        self.filter_attributes(doc, root, nodes_whitelist);
        self.enforce_tag_vocabulary(doc, root, nodes_whitelist);
    }

    fn filter_attributes(&self, doc: &mut Document, root: NodeId, whitelist: &HashSet<NodeId>) {
        for node in doc.iter(root) {
            if whitelist.contains(&node) {
                continue;
            }
            for name in URI_ATTRIBUTES {
                if doc.attr(node, name).is_some_and(is_javascript_uri) {
                    doc.set_attr(node, name, "");
                }
            }
            let names: Vec<String> =
                doc.attrs(node).iter().map(|(name, _)| name.clone()).collect();
            for name in names {
                let keep = self.safe_attrs.contains(name.as_str())
                    || (self.allow_data_attrs && name.starts_with("data-"));
                if !keep {
                    doc.remove_attr(node, &name);
                }
            }
        }
    }

    fn enforce_tag_vocabulary(
        &self,
        doc: &mut Document,
        root: NodeId,
        whitelist: &HashSet<NodeId>,
    ) {
        let mut to_remove: Vec<NodeId> = doc
            .iter_post_order(root)
            .into_iter()
            .filter(|&node| {
                !self.allow_tags.contains(doc.tag(node)) && !whitelist.contains(&node)
            })
            .collect();
        if to_remove.last() == Some(&root) {
            // The subtree root cannot be removed.
            to_remove.pop();
            doc.set_tag(root, "div");
            doc.clear_attrs(root);
        }
        for node in to_remove {
            drop_tag_preserve_spacing(doc, node, true);
        }
    }
}

fn kill_disallowed_subtrees(
    doc: &mut Document,
    node: NodeId,
    whitelist: &HashSet<NodeId>,
    is_root: bool,
) {
    if whitelist.contains(&node) {
        return;
    }
    if !is_root && KILLED_TAGS.contains(doc.tag(node)) {
        doc.drop_tree(node);
        return;
    }
    for child in doc.children(node).to_vec() {
        kill_disallowed_subtrees(doc, child, whitelist, false);
    }
}

/// A URI whose scheme is `javascript:`, ignoring embedded whitespace and
/// control characters.
fn is_javascript_uri(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    compact.to_ascii_lowercase().starts_with("javascript:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;
    use crate::serialize::node_to_html;

    fn clean_body(html: &str) -> String {
        let mut doc = parse_fragment(html);
        let root = doc.root();
        BodyCleaner::body().clean(&mut doc, root, &HashSet::new());
        node_to_html(&doc, doc.root())
    }

    #[test]
    fn block_removal_inserts_paragraph_separators() {
        let cases: &[(&str, &str)] = &[
            (
                "<html><body>pre<div>text</div>post</body></html>",
                "<div>pre<br><br>text<br><br>post</div>",
            ),
            (
                "<div>pre<div>text <strong>more</strong></div>post</div>",
                "<div>pre<br><br>text <strong>more</strong><br><br>post</div>",
            ),
            (
                "<div><div>pre</div><div>text <strong>more</strong></div></div>",
                "<div>pre<br><br>text <strong>more</strong></div>",
            ),
            (
                "<div><div>text <strong>more</strong></div>post</div>",
                "<div>text <strong>more</strong><br><br>post</div>",
            ),
            (
                "<div>pre<br><br><div>text <strong>more</strong></div>post</div>",
                "<div>pre<br><br>text <strong>more</strong><br><br>post</div>",
            ),
            (
                "<div><br>he<br><div>text</div><br><br>post</div>",
                "<div><br>he<br><br><br>text<br><br>post</div>",
            ),
            ("<div><div>text</div><div>post</div></div>", "<div>text<br><br>post</div>"),
            (
                "<div>pre<div><div>text</div></div><div>post</div></div>",
                "<div>pre<br><br>text<br><br>post</div>",
            ),
            (
                "<div>pre <span>text</span><div>post</div></div>",
                "<div>pre text<br><br>post</div>",
            ),
            (
                "<div>pre<form><div>text</div></form>post</div>",
                "<div>pre<br><br>text<br><br>post</div>",
            ),
            (
                "<div>A<div>div<div>structure</div>here</div>!</div>",
                "<div>A<br><br>div<br><br>structure<br><br>here<br><br>!</div>",
            ),
            (
                "<div>Another<div>div</div>structure<div>here</div>!</div>",
                "<div>Another<br><br>div<br><br>structure<br><br>here<br><br>!</div>",
            ),
            ("<div><div><div><div>Hey!</div></div></div></div>", "<div>Hey!</div>"),
            (
                "<div>Hurra<div><div><div>Hey!</div></div></div>Hurra</div>",
                "<div>Hurra<br><br>Hey!<br><br>Hurra</div>",
            ),
            (
                "<div>A<span> span<span> structure</span> here</span>!</div>",
                "<div>A span structure here!</div>",
            ),
            ("<div><span><span><span></span></span></span><div></div></div>", "<div></div>"),
            (
                "<div><span><span><span></span></span></span><div>Hey!</div></div>",
                "<div>Hey!</div>",
            ),
            (
                "<div><span><span><span>Double</span></span></span><div>Hey!</div></div>",
                "<div>Double<br><br>Hey!</div>",
            ),
            (
                "<div><div><div><span>Updated every <span>60</span> sg</span></div>Per minute</div></div>",
                "<div>Updated every 60 sg<br><br>Per minute</div>",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(clean_body(input), *expected, "input: {input}");
        }
    }

    #[test]
    fn attributes_outside_vocabulary_are_dropped() {
        assert_eq!(
            clean_body(r#"<div><img src="img.jpg" data-src="img.jpg" to-filter="b"></div>"#),
            r#"<div><img src="img.jpg" data-src="img.jpg"></div>"#
        );
    }

    #[test]
    fn inline_style_and_event_handlers_are_dropped() {
        assert_eq!(
            clean_body(r#"<div style="color:blue"><p onclick="x()" title="t">a</p></div>"#),
            r#"<div><p title="t">a</p></div>"#
        );
    }

    #[test]
    fn scripts_and_styles_are_killed_with_content() {
        assert_eq!(
            clean_body("<div><script>var x;</script><p>a</p><style>p{}</style></div>"),
            "<div><p>a</p></div>"
        );
    }

    #[test]
    fn javascript_uris_are_blanked() {
        assert_eq!(
            clean_body(r#"<div><a href="javascript:void(0)">x</a></div>"#),
            r#"<div><a href="">x</a></div>"#
        );
        assert_eq!(
            clean_body(r#"<div><a href="java&#10;script:void(0)">x</a></div>"#),
            r#"<div><a href="">x</a></div>"#
        );
    }

    #[test]
    fn whitelisted_subtree_is_untouched() {
        let mut doc = parse_fragment(
            r#"<div><div class="embed" style="x"><script>s</script></div><div style="y">b</div></div>"#,
        );
        let embed = doc.find_all(doc.root(), "div")[0];
        let whitelist: HashSet<NodeId> = doc.iter(embed).into_iter().collect();
        let root = doc.root();
        BodyCleaner::body().clean(&mut doc, root, &whitelist);
        assert_eq!(
            node_to_html(&doc, doc.root()),
            r#"<div><div class="embed" style="x"><script>s</script></div>b</div>"#
        );
    }

    #[test]
    fn caption_cleaner_uses_reduced_vocabulary() {
        let mut doc = parse_fragment("<figcaption><p><strong>hey</strong></p><table>x</table></figcaption>");
        let root = doc.root();
        BodyCleaner::figure_caption().clean(&mut doc, root, &HashSet::new());
        assert_eq!(
            node_to_html(&doc, doc.root()),
            "<figcaption><p><strong>hey</strong></p>x</figcaption>"
        );
    }
}
