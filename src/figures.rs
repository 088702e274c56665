//! Figure assembly: media enclosure, isolated caption grouping, caption
//! fusion and figure hygiene.
//!
//! News pages express figures in many broken ways (captions outside their
//! figure, figures built out of table rows, JS-injected empty figures).
//! These passes reshape all of them into plain
//! `<figure>media<figcaption>text</figcaption></figure>` blocks.

use std::collections::HashSet;

use crate::cleaner::BodyCleaner;
use crate::etree::{ChildrenSlice, Document, NodeId};
use crate::html_processing::{
    drop_tag_preserve_spacing, group_with_previous_content_block, wrap_tags,
};
use crate::tags;

/// Ensure all media (images, videos, etc.) are enclosed within figures.
/// When an image sits alone inside a link, the link travels into the
/// figure. Nodes in the white list are ignored.
pub fn enclose_media_within_figure(doc: &mut Document, root: NodeId, white_list: &HashSet<NodeId>) {
    wrap_tags(
        doc,
        root,
        &tags::WRAPPED_WITH_FIGURE,
        "figure",
        &tags::TRANSPARENT_CONTENT,
        white_list,
    );
}

/// Enclose top-level isolated multimedia into figures: paragraphs whose
/// whole content is a single media element (possibly linked) become the
/// figure themselves. Nodes in the white list are ignored.
pub fn top_level_media_within_figure(
    doc: &mut Document,
    root: NodeId,
    white_list: &HashSet<NodeId>,
) {
    fn is_single_tag(doc: &Document, node: NodeId) -> bool {
        doc.children(node).len() == 1
            && !doc.has_text(node)
            && !doc.has_tail(doc.children(node)[0])
    }

    for child in doc.children(root).to_vec() {
        if doc.tag(child) != "p" || !is_single_tag(doc, child) || white_list.contains(&child) {
            continue;
        }
        let only = doc.children(child)[0];
        if tags::FIGURE_CONTENT_TAGS.contains(doc.tag(only)) {
            doc.set_tag(child, "figure");
        } else if doc.tag(only) == "a" && is_single_tag(doc, only) {
            let linked = doc.children(only)[0];
            if tags::FIGURE_CONTENT_TAGS.contains(doc.tag(linked)) {
                doc.set_tag(child, "figure");
            }
        }
    }
}

/// Fill the `src` attribute from `data-src` on `img` tags. It is common to
/// see lazy-loaded images without `src` but with `data-src`.
pub fn infer_img_url_from_data_src_attr(doc: &mut Document, root: NodeId) {
    for img in doc.find_all(root, "img") {
        let src_missing = doc.attr(img, "src").is_none_or(str::is_empty);
        if !src_missing {
            continue;
        }
        if let Some(data_src) = doc.attr(img, "data-src").map(str::to_string) {
            if !data_src.is_empty() {
                doc.set_attr(img, "src", &data_src);
            }
        }
    }
}

/// Wrap isolated figcaptions together with the content block above them
/// into a new figure. When the caption sits inside a table or list, the
/// enclosing structure is dissolved first (its root is renamed to one of
/// its child tags; the incomplete-structure cleaner unwraps the rest).
/// Whitelisted captions are ignored.
pub fn create_figures_from_isolated_figcaptions(
    doc: &mut Document,
    root: NodeId,
    white_list: &HashSet<NodeId>,
) {
    for caption in doc.find_all(root, "figcaption") {
        if white_list.contains(&caption) {
            continue;
        }
        let Some(slice) = group_with_previous_content_block(doc, caption) else { continue };

        let ancestor_nodes = doc.ancestors(caption, None, Some(root));
        let has_figure_ancestor = ancestor_nodes.iter().any(|&a| doc.tag(a) == "figure");

        // A figure must not be formed out of a pure text paragraph: pages
        // that inject images with JS can lose the image entirely, leaving
        // the caption next to ordinary text. The caption alone is removed
        // later instead.
        let prev_content_node = doc.children(slice.node)[slice.start];
        let prev_content_is_paragraph = doc.tag(prev_content_node) == "p"
            && !doc
                .descendants(prev_content_node, None)
                .iter()
                .any(|&d| tags::FIGURE_CONTENT_TAGS.contains(doc.tag(d)));

        if has_figure_ancestor || prev_content_is_paragraph {
            continue;
        }

        let slice_parent_tag = doc.tag(slice.node);
        if ["table", "tbody", "thead", "tfoot", "dl", "ul", "ol"].contains(&slice_parent_tag) {
            for &ancestor in &ancestor_nodes {
                if let Some(child_tag) =
                    tags::MUST_ANCESTORS_FOR_KEEP_CONTENT_REVERSED.get(doc.tag(ancestor))
                {
                    doc.set_tag(ancestor, child_tag);
                    break;
                }
            }
        }

        let new_figure = doc.wrap_children_slice(slice, "figure");
        // A figure at the caption's own level would end up nested; unwrap
        // it inside the new one.
        for inner in doc.find_all(new_figure, "figure") {
            drop_tag_preserve_spacing(doc, inner, true);
        }
        fuse_figcaptions(doc, new_figure);
    }
}

/// Fuse the first block of consecutive figcaptions and remove the rest.
pub fn fuse_figcaptions(doc: &mut Document, figure: NodeId) {
    let children = doc.children(figure).to_vec();
    let mut start: Option<usize> = None;
    let mut end = 0usize;
    for (index, &child) in children.iter().enumerate() {
        if start.is_none() {
            if doc.tag(child) == "figcaption" {
                start = Some(index);
                end = index + 1;
            }
        } else if doc.tag(child) == "figcaption" && !doc.has_tail(children[index - 1]) {
            end = index + 1;
        } else {
            break;
        }
    }

    // Captions that cannot be fused would leave the figure inconsistent.
    for &child in children[end.min(children.len())..].iter().rev() {
        if doc.tag(child) == "figcaption" {
            drop_tag_preserve_spacing(doc, child, false);
        }
    }

    if let Some(start) = start {
        if end - start > 1 {
            let fused = doc.wrap_children_slice(
                ChildrenSlice { node: figure, start, end },
                "figcaption",
            );
            for child in doc.children(fused).to_vec() {
                if doc.parent(child) == Some(fused) {
                    drop_tag_preserve_spacing(doc, child, true);
                }
            }
        }
    }
}

/// Simplify the HTML inside every figcaption down to the caption
/// vocabulary. Whitelisted captions are ignored.
pub fn clean_figcaptions_html(doc: &mut Document, root: NodeId, white_list: &HashSet<NodeId>) {
    let cleaner = BodyCleaner::figure_caption();
    let no_whitelist = HashSet::new();
    for caption in doc.find_all(root, "figcaption") {
        if white_list.contains(&caption) {
            continue;
        }
        cleaner.clean(doc, caption, &no_whitelist);
    }
}

/// Remove figures holding nothing but their caption. This happens on pages
/// that inject the figure content with JS. Whitelisted figures are
/// ignored.
pub fn remove_figures_without_content(doc: &mut Document, root: NodeId, white_list: &HashSet<NodeId>) {
    for figure in doc.find_all(root, "figure") {
        if white_list.contains(&figure) {
            continue;
        }
        let children = doc.children(figure);
        let has_non_caption_child =
            children.iter().any(|&child| doc.tag(child) != "figcaption");
        // A single figcaption with a tail still marks real content.
        let first_child_has_tail =
            children.first().is_some_and(|&first| doc.has_tail(first));
        if !has_non_caption_child && !doc.has_text(figure) && !first_child_has_tail {
            drop_tag_preserve_spacing(doc, figure, false);
        }
    }
}

/// Remove a stray double `br` sitting right above a figcaption. Figures
/// built from table markup can end up with one after the table elements
/// are cleaned away.
pub fn clean_double_br_above_figcaption(
    doc: &mut Document,
    root: NodeId,
    white_list: &HashSet<NodeId>,
) {
    for caption in doc.find_all(root, "figcaption") {
        if white_list.contains(&caption) {
            continue;
        }
        let Some(parent) = doc.parent(caption) else { continue };
        let Some(index) = doc.index_of(parent, caption) else { continue };
        if index < 2 {
            continue;
        }
        let children = doc.children(parent);
        let (before, further) = (children[index - 1], children[index - 2]);
        if doc.tag(before) == "br"
            && !doc.has_tail(before)
            && doc.tag(further) == "br"
            && !doc.has_tail(further)
        {
            doc.drop_tree(before);
            doc.drop_tree(further);
        }
    }
}
