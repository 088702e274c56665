//! Tree rewriting passes shared by the cleaning pipeline.
//!
//! The pivotal primitive is [`drop_tag_preserve_spacing`]: removing a block
//! element from inline context risks collapsing two paragraphs into one, so
//! the surroundings are inspected and double `<br>` separators are inserted
//! where text chunks would otherwise merge. The paragraphizer later turns
//! those separators back into paragraphs.

use std::collections::{HashMap, HashSet};

use crate::etree::{ChildrenSlice, Document, NodeId};
use crate::tags;

/// Translate tag names (i.e. `b` -> `strong`). Mutates the doc. Nodes in
/// the white list are ignored.
pub fn translate_tags(doc: &mut Document, white_list: &HashSet<NodeId>) {
    for node in doc.iter(doc.root()) {
        if white_list.contains(&node) {
            continue;
        }
        if let Some(translation) = tags::TAG_TRANSLATIONS.get(doc.tag(node)) {
            doc.set_tag(node, translation);
        }
    }
}

/// Ensure that the root tag is `article`. A new root element may be
/// created; the document is re-rooted accordingly and the final root is
/// returned.
pub fn set_article_tag_as_root(doc: &mut Document) -> NodeId {
    let root = doc.root();
    if tags::ALLOWED_TAGS.contains(doc.tag(root)) {
        // The current root is content on its own. Enclose it.
        let wrapper = doc.wrap_element_with_tag(root, "article");
        doc.set_root(wrapper);
        wrapper
    } else {
        // Reuse this tag. The root node is never removed by the cleaner.
        doc.set_tag(root, "article");
        doc.clear_attrs(root);
        root
    }
}

/// Enclose elements with a tag in `to_be_enclosed_tags` within a new
/// `enclosing_tag` element, unless `enclosing_tag` is already an ancestor.
/// Transparent ancestors carrying no content of their own travel into the
/// new element (so `<a><img></a>` is wrapped link included).
pub fn wrap_tags(
    doc: &mut Document,
    root: NodeId,
    to_be_enclosed_tags: &HashSet<&'static str>,
    enclosing_tag: &str,
    transparent_tags: &HashSet<&'static str>,
    white_list: &HashSet<NodeId>,
) {
    let mut ancestors_tags = vec![doc.tag(root).to_string()];
    for child in doc.children(root).to_vec() {
        wrap_tags_with(
            doc,
            child,
            to_be_enclosed_tags,
            enclosing_tag,
            &mut ancestors_tags,
            transparent_tags,
            white_list,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn wrap_tags_with(
    doc: &mut Document,
    node: NodeId,
    to_be_enclosed_tags: &HashSet<&'static str>,
    enclosing_tag: &str,
    ancestors_tags: &mut Vec<String>,
    transparent_tags: &HashSet<&'static str>,
    white_list: &HashSet<NodeId>,
) {
    if white_list.contains(&node) {
        return;
    }
    ancestors_tags.push(doc.tag(node).to_string());
    let must_enclose = !ancestors_tags.iter().any(|t| t == enclosing_tag)
        && to_be_enclosed_tags.contains(doc.tag(node));
    if must_enclose {
        // Climb through transparent parents that hold nothing but the
        // element to enclose.
        let mut to_enclose = node;
        let mut parent = doc.parent(node);
        while let Some(candidate) = parent {
            if !transparent_tags.contains(doc.tag(candidate)) {
                break;
            }
            if doc.children(candidate).len() != 1 || doc.has_text(candidate) {
                break;
            }
            to_enclose = candidate;
            parent = doc.parent(candidate);
        }
        doc.wrap_element_with_tag(to_enclose, enclosing_tag);
    } else {
        for child in doc.children(node).to_vec() {
            wrap_tags_with(
                doc,
                child,
                to_be_enclosed_tags,
                enclosing_tag,
                ancestors_tags,
                transparent_tags,
                white_list,
            );
        }
    }
    ancestors_tags.pop();
}

/// Remove empty tags, skipping tags in `tag_white_list` and nodes in
/// `nodes_white_list`. The root is never removed.
pub fn remove_empty_tags(
    doc: &mut Document,
    tag_white_list: &HashSet<&'static str>,
    nodes_white_list: &HashSet<NodeId>,
) {
    remove_empty_tags_inner(doc, doc.root(), tag_white_list, nodes_white_list, true);
}

fn remove_empty_tags_inner(
    doc: &mut Document,
    node: NodeId,
    tag_white_list: &HashSet<&'static str>,
    nodes_white_list: &HashSet<NodeId>,
    is_root: bool,
) {
    if nodes_white_list.contains(&node) {
        return;
    }
    for child in doc.children(node).to_vec() {
        remove_empty_tags_inner(doc, child, tag_white_list, nodes_white_list, false);
    }
    if !is_root
        && !tag_white_list.contains(doc.tag(node))
        && doc.children(node).is_empty()
        && !doc.has_text(node)
    {
        doc.drop_tag(node);
    }
}

/// Drop a tag keeping its content. If the element is a block element,
/// leading or trailing double `br` tags are introduced where needed to
/// preserve the separation between text chunks. With
/// `preserve_content = false` the entire subtree is deleted instead (still
/// preserving spacing). No-op on the root node.
pub fn drop_tag_preserve_spacing(doc: &mut Document, node: NodeId, preserve_content: bool) {
    let Some(parent) = doc.parent(node) else { return };
    let Some(mut index) = doc.index_of(parent, node) else { return };

    if !tags::is_phrasing_content(doc.tag(node)) {
        let sibling_count = doc.children(parent).len();
        let siblings = doc.children(parent);

        let prev_is_inline = index != 0
            && tags::PHRASING_CONTENT.contains(doc.tag(siblings[index - 1]))
            && !double_br(doc, parent, index as isize - 2, index as isize - 1);
        let after_is_inline = index != sibling_count - 1
            && tags::PHRASING_CONTENT.contains(doc.tag(siblings[index + 1]))
            && !double_br(doc, parent, index as isize + 1, index as isize + 2);

        let has_text_prev = !doc.prev_text(node).trim().is_empty() || prev_is_inline;
        let has_text_inside =
            preserve_content && (doc.has_text(node) || !doc.children(node).is_empty());
        let has_text_after = doc.has_tail(node) || after_is_inline;

        if has_text_prev && (has_text_inside || has_text_after) {
            for _ in 0..2 {
                let br = doc.new_element("br");
                doc.insert(parent, index, br);
            }
            index += 2;
        }
        if has_text_inside && has_text_after {
            let last_br = doc.new_element("br");
            let tail = doc.tail(node).map(str::to_string);
            doc.set_tail(last_br, tail);
            doc.set_tail(node, None);
            doc.insert(parent, index + 1, last_br);
            let br = doc.new_element("br");
            doc.insert(parent, index + 1, br);
        }
    }

    if preserve_content {
        doc.drop_tag(node);
    } else {
        doc.drop_tree(node);
    }
}

/// True when `parent[start]` and `parent[end]` form a double `br` with no
/// intervening tail text (`end - start` must be 1).
fn double_br(doc: &Document, parent: NodeId, start: isize, end: isize) -> bool {
    if end - start != 1 {
        return false;
    }
    let len = doc.children(parent).len() as isize;
    if start < 0 || end < 0 || start >= len || end >= len {
        return false;
    }
    let children = doc.children(parent);
    let (first, second) = (children[start as usize], children[end as usize]);
    doc.tag(first) == "br" && doc.tag(second) == "br" && !doc.has_tail(first)
}

/// A node has content if its subtree holds any text or any tag handling
/// non-textual content like `img` or `iframe`. `br`, `dt`, `dd` and `td`
/// count as non-content.
#[must_use]
pub fn has_no_content(doc: &Document, node: NodeId) -> bool {
    doc.is_empty_subtree(node, &tags::CONTENT_EVEN_IF_EMPTY)
}

/// Group the node's content block with the previous content block,
/// returning the covering slice of children. `None` when the node is the
/// root or no previous content exists at this level.
#[must_use]
pub fn group_with_previous_content_block(doc: &Document, node: NodeId) -> Option<ChildrenSlice> {
    let parent = doc.parent(node)?;
    let index = doc.index_of(parent, node)?;
    if let Some(first_with_content) = find_previous_non_empty_sibling(doc, node) {
        Some(ChildrenSlice { node: parent, start: first_with_content, end: index + 1 })
    } else if doc.children(parent).len() == 1 && !doc.has_text(parent) && !doc.has_tail(node) {
        group_with_previous_content_block(doc, parent)
    } else {
        None
    }
}

/// Index of the nearest previous sibling that has content and carries no
/// tail text, skipping visually empty siblings.
#[must_use]
pub fn find_previous_non_empty_sibling(doc: &Document, node: NodeId) -> Option<usize> {
    let parent = doc.parent(node)?;
    let index = doc.index_of(parent, node)?;
    let children = doc.children(parent);
    let mut candidate = index as isize - 1;
    while candidate >= 0 {
        let sibling = children[candidate as usize];
        if doc.has_tail(sibling) || has_no_content(doc, sibling) {
            candidate -= 1;
        } else {
            break;
        }
    }
    usize::try_from(candidate).ok()
}

/// Drop tags of incomplete structures: elements whose tag requires one of
/// the ancestors in `rules` that is no longer present. The root element is
/// never cleaned. With `preserve_content = false` matching nodes are
/// removed entirely (spacing preserved either way). Nodes in the white
/// list are ignored.
pub fn clean_incomplete_structures(
    doc: &mut Document,
    rules: &HashMap<&'static str, HashSet<&'static str>>,
    preserve_content: bool,
    white_list: &HashSet<NodeId>,
) {
    let root = doc.root();
    let mut ancestors_tags = vec![doc.tag(root).to_string()];
    for child in doc.children(root).to_vec() {
        clean_incomplete_inner(doc, child, rules, &mut ancestors_tags, preserve_content, white_list);
    }
}

fn clean_incomplete_inner(
    doc: &mut Document,
    node: NodeId,
    rules: &HashMap<&'static str, HashSet<&'static str>>,
    ancestors_tags: &mut Vec<String>,
    preserve_content: bool,
    white_list: &HashSet<NodeId>,
) {
    ancestors_tags.push(doc.tag(node).to_string());
    for child in doc.children(node).to_vec() {
        clean_incomplete_inner(doc, child, rules, ancestors_tags, preserve_content, white_list);
    }
    ancestors_tags.pop();

    if let Some(required) = rules.get(doc.tag(node)) {
        let satisfied = ancestors_tags.iter().any(|t| required.contains(t.as_str()));
        if !satisfied && !white_list.contains(&node) {
            drop_tag_preserve_spacing(doc, node, preserve_content);
        }
    }
}

/// Remove the content (text and children) of every descendant with the
/// given tag; the elements themselves and their attributes stay.
pub fn kill_tag_content(doc: &mut Document, root: NodeId, tag: &str) {
    for node in doc.find_all(root, tag) {
        doc.set_text(node, None);
        doc.remove_children(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;
    use crate::serialize::node_to_html;

    fn html(doc: &Document) -> String {
        node_to_html(doc, doc.root())
    }

    fn find_nth(doc: &Document, tag: &str, nth: usize) -> NodeId {
        doc.find_all(doc.root(), tag)[nth]
    }

    // === drop_tag_preserve_spacing, keeping content ===

    #[test]
    fn drop_spacing_keep_cases() {
        let cases: &[(&str, &str, usize, &str)] = &[
            ("<div>pre<p>text</p>post</div>", "p", 0, "<div>pre<br><br>text<br><br>post</div>"),
            (
                "<div>pre<p>text <strong>more</strong></p>post</div>",
                "p",
                0,
                "<div>pre<br><br>text <strong>more</strong><br><br>post</div>",
            ),
            (
                "<div><p>pre</p><p>text <strong>more</strong></p></div>",
                "p",
                1,
                "<div><p>pre</p>text <strong>more</strong></div>",
            ),
            (
                "<div><p>text <strong>more</strong></p>post</div>",
                "p",
                0,
                "<div>text <strong>more</strong><br><br>post</div>",
            ),
            (
                "<div>pre<br><br><p>text <strong>more</strong></p>post</div>",
                "p",
                0,
                "<div>pre<br><br>text <strong>more</strong><br><br>post</div>",
            ),
            (
                "<div><br>he<br><p>text</p><br><br>post</div>",
                "p",
                0,
                "<div><br>he<br><br><br>text<br><br>post</div>",
            ),
            ("<div><p>text</p><p>post</p></div>", "p", 0, "<div>text<p>post</p></div>"),
            (
                "<div>pre<invented> text </invented>post</div>",
                "invented",
                0,
                "<div>pre text post</div>",
            ),
        ];
        for (input, tag, nth, expected) in cases {
            let mut doc = parse_fragment(input);
            let target = find_nth(&doc, tag, *nth);
            drop_tag_preserve_spacing(&mut doc, target, true);
            assert_eq!(html(&doc), *expected, "input: {input}");
        }
    }

    // === drop_tag_preserve_spacing, dropping content ===

    #[test]
    fn drop_spacing_drop_cases() {
        let cases: &[(&str, &str, usize, &str)] = &[
            ("<div>pre<p>text</p>post</div>", "p", 0, "<div>pre<br><br>post</div>"),
            (
                "<div>pre<p>text <strong>more</strong></p>post</div>",
                "p",
                0,
                "<div>pre<br><br>post</div>",
            ),
            (
                "<div><p>pre</p><p>text <strong>more</strong></p></div>",
                "p",
                1,
                "<div><p>pre</p></div>",
            ),
            ("<div><p>text <strong>more</strong></p>post</div>", "p", 0, "<div>post</div>"),
            (
                "<div>pre<br><br><p>text <strong>more</strong></p>post</div>",
                "p",
                0,
                "<div>pre<br><br>post</div>",
            ),
            (
                "<div><br>he<br><p>text</p><br><br>post</div>",
                "p",
                0,
                "<div><br>he<br><br><br>post</div>",
            ),
            ("<div><p>text</p><p>post</p></div>", "p", 0, "<div><p>post</p></div>"),
            ("<div>pre<invented> text </invented>post</div>", "invented", 0, "<div>prepost</div>"),
        ];
        for (input, tag, nth, expected) in cases {
            let mut doc = parse_fragment(input);
            let target = find_nth(&doc, tag, *nth);
            drop_tag_preserve_spacing(&mut doc, target, false);
            assert_eq!(html(&doc), *expected, "input: {input}");
        }
    }

    #[test]
    fn drop_spacing_is_noop_on_root() {
        let mut doc = parse_fragment("<div>text</div>");
        let root = doc.root();
        drop_tag_preserve_spacing(&mut doc, root, true);
        assert_eq!(html(&doc), "<div>text</div>");
    }

    // === translate_tags ===

    #[test]
    fn translate_deprecated_tags() {
        let mut doc = parse_fragment("<p><b><i>text</i></b></p>");
        translate_tags(&mut doc, &HashSet::new());
        assert_eq!(html(&doc), "<p><strong><em>text</em></strong></p>");
    }

    #[test]
    fn translate_skips_whitelisted_nodes() {
        let mut doc = parse_fragment("<p><b>keep</b><i>change</i></p>");
        let b = find_nth(&doc, "b", 0);
        let white_list: HashSet<NodeId> = [b].into_iter().collect();
        translate_tags(&mut doc, &white_list);
        assert_eq!(html(&doc), "<p><b>keep</b><em>change</em></p>");
    }

    // === set_article_tag_as_root ===

    #[test]
    fn root_with_allowed_tag_gets_wrapped() {
        let mut doc = parse_fragment("<p>text</p>");
        let root = set_article_tag_as_root(&mut doc);
        assert_eq!(doc.root(), root);
        assert_eq!(html(&doc), "<article><p>text</p></article>");
    }

    #[test]
    fn root_with_disallowed_tag_gets_renamed() {
        let mut doc = parse_fragment("<section id=\"x\"><p>text</p></section>");
        set_article_tag_as_root(&mut doc);
        assert_eq!(html(&doc), "<article><p>text</p></article>");
    }

    // === remove_empty_tags ===

    #[test]
    fn remove_empty_cascades() {
        let mut doc = parse_fragment("<article><p><em></em></p></article>");
        remove_empty_tags(&mut doc, &HashSet::new(), &HashSet::new());
        assert_eq!(html(&doc), "<article></article>");
    }

    #[test]
    fn remove_empty_honors_tag_whitelist() {
        let mut doc = parse_fragment("<article><p><em></em></p></article>");
        let keep: HashSet<&'static str> = ["p"].into_iter().collect();
        remove_empty_tags(&mut doc, &keep, &HashSet::new());
        assert_eq!(html(&doc), "<article><p></p></article>");
    }

    #[test]
    fn remove_empty_honors_node_whitelist() {
        let mut doc = parse_fragment("<article><p></p><p></p></article>");
        let first = find_nth(&doc, "p", 0);
        let white_list: HashSet<NodeId> = [first].into_iter().collect();
        remove_empty_tags(&mut doc, &HashSet::new(), &white_list);
        assert_eq!(html(&doc), "<article><p></p></article>");
    }

    #[test]
    fn remove_empty_keeps_tails() {
        let mut doc = parse_fragment("<article>a<span></span>b</article>");
        remove_empty_tags(&mut doc, &HashSet::new(), &HashSet::new());
        assert_eq!(html(&doc), "<article>ab</article>");
    }

    // === clean_incomplete_structures ===

    #[test]
    fn complete_table_is_untouched() {
        let mut doc =
            parse_fragment("<div>pre<table><tbody><tr><td>text</td></tr></tbody></table>post</div>");
        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
            true,
            &HashSet::new(),
        );
        assert_eq!(
            html(&doc),
            "<div>pre<table><tbody><tr><td>text</td></tr></tbody></table>post</div>"
        );
    }

    #[test]
    fn orphan_definition_items_are_unwrapped() {
        let mut doc = parse_fragment("<div><dt>key</dt><dd>value</dd></div>");
        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
            true,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div>key<br><br>value</div>");
    }

    #[test]
    fn orphan_items_with_surrounding_text() {
        let mut doc = parse_fragment("<div>pre<dt>key</dt><dd>value</dd>post</div>");
        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
            true,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div>pre<br><br>key<br><br>value<br><br>post</div>");
    }

    #[test]
    fn orphan_items_dropped_without_content() {
        let mut doc = parse_fragment("<div>A<dt>key</dt>text<dd>value</dd>to preserve</div>");
        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
            false,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div>A<br><br>text<br><br>to preserve</div>");
    }

    #[test]
    fn orphan_figcaption_dropped_with_content() {
        let mut doc = parse_fragment("<div>pre<figcaption>f</figcaption>post</div>");
        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_DROP_CONTENT,
            false,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div>pre<br><br>post</div>");
    }

    #[test]
    fn orphan_list_items_built_by_dissolution() {
        // <div><li>a</li><li>b</li></div> built through the tree API, the
        // way the figure assembler leaves it after renaming a list root.
        let mut doc = Document::new("div");
        let li1 = doc.sub_element(doc.root(), "li");
        doc.set_text(li1, Some("a".into()));
        let li2 = doc.sub_element(doc.root(), "li");
        doc.set_text(li2, Some("b".into()));

        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
            true,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div>a<br><br>b</div>");
    }

    #[test]
    fn whitelisted_orphans_survive_at_depth() {
        let mut doc = Document::new("div");
        let wrap = doc.sub_element(doc.root(), "p");
        let li = doc.sub_element(wrap, "li");
        doc.set_text(li, Some("keep".into()));
        let white_list: HashSet<NodeId> = [li].into_iter().collect();

        clean_incomplete_structures(
            &mut doc,
            &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
            true,
            &white_list,
        );
        assert_eq!(html(&doc), "<div><p><li>keep</li></p></div>");
    }

    // === kill_tag_content ===

    #[test]
    fn kill_iframe_text_content() {
        let mut doc = parse_fragment(r#"<div><iframe cls="pepe">h<p>e</p>l</iframe></div>"#);
        let root = doc.root();
        kill_tag_content(&mut doc, root, "iframe");
        assert_eq!(html(&doc), r#"<div><iframe cls="pepe"></iframe></div>"#);
    }

    #[test]
    fn kill_iframe_element_children() {
        let mut doc = Document::new("div");
        let iframe = doc.sub_element(doc.root(), "iframe");
        doc.set_attr(iframe, "src", "x");
        doc.set_text(iframe, Some("h".into()));
        let p = doc.sub_element(iframe, "p");
        doc.set_text(p, Some("e".into()));

        let root = doc.root();
        kill_tag_content(&mut doc, root, "iframe");
        assert_eq!(html(&doc), r#"<div><iframe src="x"></iframe></div>"#);
    }

    #[test]
    fn kill_keeps_surrounding_text() {
        let mut doc = Document::new("div");
        doc.set_text(doc.root(), Some("a".into()));
        let iframe = doc.sub_element(doc.root(), "iframe");
        doc.set_text(iframe, Some("inner".into()));
        doc.set_tail(iframe, Some("b".into()));

        let root = doc.root();
        kill_tag_content(&mut doc, root, "iframe");
        assert_eq!(html(&doc), "<div>a<iframe></iframe>b</div>");
    }

    // === grouping helpers ===

    #[test]
    fn previous_non_empty_sibling_found() {
        let mut doc = Document::new("div");
        let end = doc.sub_element(doc.root(), "div");
        doc.set_text(end, Some("end".into()));
        let caption = doc.sub_element(doc.root(), "figcaption");
        doc.set_text(caption, Some("fig".into()));

        assert_eq!(find_previous_non_empty_sibling(&doc, caption), Some(0));
    }

    #[test]
    fn previous_sibling_with_tail_blocks_grouping() {
        let mut doc = Document::new("div");
        let end = doc.sub_element(doc.root(), "div");
        doc.set_text(end, Some("end".into()));
        doc.set_tail(end, Some("t".into()));
        let caption = doc.sub_element(doc.root(), "figcaption");
        doc.set_text(caption, Some("fig".into()));

        assert_eq!(find_previous_non_empty_sibling(&doc, caption), None);
    }

    #[test]
    fn empty_previous_sibling_is_skipped() {
        let mut doc = Document::new("div");
        let _empty = doc.sub_element(doc.root(), "div");
        let caption = doc.sub_element(doc.root(), "figcaption");
        doc.set_text(caption, Some("fig".into()));

        assert_eq!(find_previous_non_empty_sibling(&doc, caption), None);
    }

    #[test]
    fn group_spans_back_to_content() {
        // <article><p>hey</p><p></p><figcaption>fig</figcaption><p></p></article>
        let mut doc = Document::new("article");
        let p1 = doc.sub_element(doc.root(), "p");
        doc.set_text(p1, Some("hey".into()));
        let _p2 = doc.sub_element(doc.root(), "p");
        let caption = doc.sub_element(doc.root(), "figcaption");
        doc.set_text(caption, Some("fig".into()));
        let _p3 = doc.sub_element(doc.root(), "p");

        let slice = group_with_previous_content_block(&doc, caption);
        assert_eq!(slice, Some(ChildrenSlice { node: doc.root(), start: 0, end: 3 }));
    }

    #[test]
    fn group_recurses_through_single_child_parents() {
        // <article><p>hey</p><div><div>end</div><figcaption>fig</figcaption></div></article>
        // with the caption wrapped in its own empty holder
        let mut doc = Document::new("article");
        let p = doc.sub_element(doc.root(), "p");
        doc.set_text(p, Some("hey".into()));
        let outer = doc.sub_element(doc.root(), "div");
        let end = doc.sub_element(outer, "div");
        doc.set_text(end, Some("end".into()));
        let caption = doc.sub_element(outer, "figcaption");
        doc.set_text(caption, Some("fig".into()));

        let slice = group_with_previous_content_block(&doc, caption);
        assert_eq!(slice, Some(ChildrenSlice { node: outer, start: 0, end: 2 }));
    }

    #[test]
    fn group_returns_none_for_root() {
        let doc = Document::new("figcaption");
        assert_eq!(group_with_previous_content_block(&doc, doc.root()), None);
    }

    // === wrap_tags ===

    #[test]
    fn wrap_tags_skips_already_enclosed() {
        let mut doc = parse_fragment("<div><figure><img></figure><img></div>");
        let root = doc.root();
        wrap_tags(
            &mut doc,
            root,
            &tags::WRAPPED_WITH_FIGURE,
            "figure",
            &tags::TRANSPARENT_CONTENT,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div><figure><img></figure><figure><img></figure></div>");
    }

    #[test]
    fn wrap_tags_carries_transparent_link() {
        let mut doc = parse_fragment("<div><a><img></a></div>");
        let root = doc.root();
        wrap_tags(
            &mut doc,
            root,
            &tags::WRAPPED_WITH_FIGURE,
            "figure",
            &tags::TRANSPARENT_CONTENT,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div><figure><a><img></a></figure></div>");
    }

    #[test]
    fn wrap_tags_leaves_link_with_text_outside() {
        let mut doc = parse_fragment("<div><a>t<img></a></div>");
        let root = doc.root();
        wrap_tags(
            &mut doc,
            root,
            &tags::WRAPPED_WITH_FIGURE,
            "figure",
            &tags::TRANSPARENT_CONTENT,
            &HashSet::new(),
        );
        assert_eq!(html(&doc), "<div><a>t<figure><img></figure></a></div>");
    }
}
