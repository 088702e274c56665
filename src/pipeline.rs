//! The cleaning pipeline: a fixed sequence of tree-mutating passes.
//!
//! Cleanup removes tags in two different ways. Inline tags unwrap with no
//! extra spacing: `<p>I like <span>Spain</span></p>` simplifies to
//! `<p>I like Spain</p>`. Block tags separate blocks of content, so
//! `<div>first</div><div>second</div>` must end up as two paragraphs. That
//! happens in two stages: removal first separates the chunks with a double
//! `<br>` (`first<br><br>second`), then the paragraphizer converts runs of
//! consecutive `<br>` back into paragraphs. The pass order is load-bearing:
//! the separators inserted by the sanitizer and the figure assembler are
//! consumed by the paragraphizer.

use std::collections::HashSet;

use crate::cleaner::BodyCleaner;
use crate::etree::{Document, NodeId};
use crate::figures::{
    clean_double_br_above_figcaption, clean_figcaptions_html,
    create_figures_from_isolated_figcaptions, enclose_media_within_figure,
    infer_img_url_from_data_src_attr, remove_figures_without_content,
    top_level_media_within_figure,
};
use crate::headings::normalize_headings_level;
use crate::html_processing::{
    clean_incomplete_structures, kill_tag_content, remove_empty_tags, set_article_tag_as_root,
    translate_tags,
};
use crate::tags;
use crate::url_utils::make_links_absolute;

/// Clean the tree in place. The root node can change, so the final root is
/// returned (and installed on the document). Nodes in `nodes_whitelist`
/// are preserved intact.
pub fn clean_doc(
    doc: &mut Document,
    base_url: Option<&str>,
    nodes_whitelist: &HashSet<NodeId>,
) -> NodeId {
    if let Some(base_url) = base_url {
        make_links_absolute(doc, base_url);
    }
    let start_root = doc.root();
    infer_img_url_from_data_src_attr(doc, start_root);
    translate_tags(doc, nodes_whitelist);
    remove_empty_tags(doc, &tags::CAN_BE_EMPTY, nodes_whitelist);
    BodyCleaner::body().clean(doc, start_root, nodes_whitelist);

    let root = set_article_tag_as_root(doc);
    normalize_headings_level(doc, root, nodes_whitelist);
    enclose_media_within_figure(doc, root, nodes_whitelist);
    create_figures_from_isolated_figcaptions(doc, root, nodes_whitelist);
    remove_figures_without_content(doc, root, nodes_whitelist);
    clean_incomplete_structures(
        doc,
        &tags::MUST_ANCESTORS_FOR_KEEP_CONTENT,
        true,
        nodes_whitelist,
    );
    clean_incomplete_structures(
        doc,
        &tags::MUST_ANCESTORS_FOR_DROP_CONTENT,
        false,
        nodes_whitelist,
    );
    clean_double_br_above_figcaption(doc, root, nodes_whitelist);
    clean_figcaptions_html(doc, root, nodes_whitelist);
    // Text extraction from iframes usually pollutes the article.
    kill_tag_content(doc, root, "iframe");
    paragraphy(doc, root);
    top_level_media_within_figure(doc, root, nodes_whitelist);
    almost_pretty_format(doc, root, base_url);
    root
}

/// Ensure all first-level textual content sits inside a paragraph.
/// Sequences of two or more consecutive `br` children act as separators:
/// the surrounding inline runs become paragraphs and the separators are
/// discarded. Children keep their identity; they are moved, never copied.
pub fn paragraphy(doc: &mut Document, root: NodeId) {
    let children = doc.children(root).to_vec();
    let child_count = children.len();

    // Maximal runs of consecutive br children with no intervening tail.
    let mut br_sequences: Vec<(usize, usize)> = Vec::new();
    let mut run_start: Option<usize> = None;
    for (index, &child) in children.iter().enumerate() {
        if doc.tag(child) != "br" {
            continue;
        }
        if index == 0 || doc.tag(children[index - 1]) != "br" || doc.has_tail(children[index - 1])
        {
            run_start = Some(index);
        }
        if index == child_count - 1
            || doc.tag(children[index + 1]) != "br"
            || doc.has_tail(child)
        {
            if run_start == Some(index) {
                // A single br stays inline.
                run_start = None;
            } else if let Some(start) = run_start.take() {
                br_sequences.push((start, index));
            }
        }
    }

    let mut force_split = vec![false; child_count];
    for &(start, end) in &br_sequences {
        for flag in &mut force_split[start..=end] {
            *flag = true;
        }
    }

    for &child in &children {
        doc.detach(child);
    }

    let mut chunk: Vec<NodeId> = Vec::new();
    let mut include_root_text = true;

    fn flush_chunk(
        doc: &mut Document,
        root: NodeId,
        children: &[NodeId],
        chunk: &mut Vec<NodeId>,
        include_root_text: &mut bool,
        index: usize,
    ) {
        let paragraph = doc.new_element("p");
        for &node in chunk.iter() {
            doc.append(paragraph, node);
        }
        if *include_root_text {
            let text = doc.text(root).map(|t| t.trim_start().to_string());
            doc.set_text(paragraph, text);
            doc.set_text(root, None);
            *include_root_text = false;
        } else {
            let before_chunk = index - chunk.len() - 1;
            let text = doc.tail(children[before_chunk]).map(|t| t.trim_end().to_string());
            doc.set_text(paragraph, text);
            doc.set_tail(children[before_chunk], None);
        }
        chunk.clear();
        if doc.has_text(paragraph) || !doc.children(paragraph).is_empty() {
            doc.append(root, paragraph);
        }
    }

    for (index, &child) in children.iter().enumerate() {
        if tags::PHRASING_CONTENT.contains(doc.tag(child)) && !force_split[index] {
            chunk.push(child);
        } else {
            flush_chunk(doc, root, &children, &mut chunk, &mut include_root_text, index);
            if !force_split[index] {
                doc.append(root, child);
            }
        }
    }
    flush_chunk(doc, root, &children, &mut chunk, &mut include_root_text, child_count);
}

/// Format the first level of the tree for readable serialization: one
/// blank line between top-level children, leading/trailing whitespace
/// stripped. Pre-existing text at these positions is unexpected and logged
/// before being overwritten.
pub fn almost_pretty_format(doc: &mut Document, root: NodeId, url: Option<&str>) {
    let url = url.unwrap_or("");
    if doc.has_text(root) {
        log::warn!(
            "Unexpected text found '{}' for url '{}' in root node or article body. Removing it and going ahead.",
            doc.text(root).unwrap_or(""),
            url
        );
    }
    doc.set_text(root, Some("\n\n".to_string()));

    for child in doc.children(root).to_vec() {
        if doc.has_tail(child) {
            log::warn!(
                "Unexpected text found '{}' for url '{}' in the tail of a first level child of the article body node. Removing it and going ahead.",
                doc.tail(child).unwrap_or(""),
                url
            );
        }
        doc.set_tail(child, Some("\n\n".to_string()));

        if doc.tag(child) == "pre" {
            continue;
        }
        let text = doc.text(child).unwrap_or("").trim_start().to_string();
        if let Some(&last) = doc.children(child).last() {
            doc.set_text(child, Some(text));
            let tail = doc.tail(last).unwrap_or("").trim_end().to_string();
            doc.set_tail(last, Some(tail));
        } else {
            doc.set_text(child, Some(text.trim_end().to_string()));
        }
    }
}
