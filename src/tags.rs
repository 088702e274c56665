//! Tag and attribute catalogs defining the cleaned-HTML schema.
//!
//! The output of the pipeline is a tightly bounded subset of HTML: a small
//! allowed tag vocabulary, a small allowed attribute vocabulary, and a few
//! ancestry rules (list items inside lists, table cells inside tables).
//! Everything here is a process-wide immutable table, initialized once.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Attributes that survive cleaning (plus any `data-*` attribute).
pub static ALLOWED_ATTRIBUTES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "alt", "cite", "colspan", "datetime", "dir", "href", "label", "rowspan", "src",
        "srcset", "sizes", "start", "title", "type", "value", "vspace",
    ]
    .into_iter()
    .collect()
});

/// Tags that are expected to carry text directly.
pub static CAN_HAVE_TEXT_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "p", "h1", "h2", "h3", "h4", "h5", "h6", "aside", "blockquote", "code", "pre",
        "li", "td", "dt", "dd", "b", "strong", "i", "em", "u", "sup", "sub", "s",
        "figcaption", "cite",
    ]
    .into_iter()
    .collect()
});

/// Tags accepted as immediate children of the `<article>` root.
pub static TOP_LEVEL_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "p", "h1", "h2", "h3", "h4", "h5", "h6", "figure", "aside", "blockquote", "code",
        "pre", "ul", "ol", "table", "dl",
    ]
    .into_iter()
    .collect()
});

/// Inline markup kept inside paragraphs.
pub static INLINE_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["br", "strong", "em", "u", "sup", "sub", "a", "s", "cite"]
        .into_iter()
        .collect()
});

/// Media elements that belong inside a `<figure>`.
pub static FIGURE_CONTENT_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["img", "video", "audio", "iframe", "embed", "object"]
        .into_iter()
        .collect()
});

/// Tags that the enclose-media pass wraps with a `<figure>`.
pub static WRAPPED_WITH_FIGURE: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = FIGURE_CONTENT_TAGS.iter().copied().collect();
    set.insert("figcation");
    set
});

/// Tags embedding external content.
pub static EMBEDDING_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["video", "audio", "source", "iframe", "embed", "object"]
        .into_iter()
        .collect()
});

pub static TABLE_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["table", "thead", "tfoot", "tbody", "th", "tr", "td"]
        .into_iter()
        .collect()
});

pub static DEF_LIST_TAGS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["dl", "dt", "dd"].into_iter().collect());

pub static LIST_TAGS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["ul", "ol", "li"].into_iter().collect());

/// Tags that are meaningful even without any content.
pub static CAN_BE_EMPTY: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = ["img", "br", "dt", "dd", "td"].into_iter().collect();
    set.extend(EMBEDDING_TAGS.iter().copied());
    set
});

/// Transparent containers that may travel with the element they wrap
/// (a linked image keeps its link inside the figure).
pub static TRANSPARENT_CONTENT: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["a"].into_iter().collect());

/// The full output tag vocabulary.
pub static ALLOWED_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();
    set.extend(CAN_HAVE_TEXT_TAGS.iter().copied());
    set.extend(TOP_LEVEL_TAGS.iter().copied());
    set.extend(INLINE_TAGS.iter().copied());
    set.extend(WRAPPED_WITH_FIGURE.iter().copied());
    set.extend(TABLE_TAGS.iter().copied());
    set.extend(DEF_LIST_TAGS.iter().copied());
    set.extend(LIST_TAGS.iter().copied());
    set.extend(EMBEDDING_TAGS.iter().copied());
    set
});

/// The reduced vocabulary allowed inside figure captions.
pub static FIGURE_CAPTION_ALLOWED_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = ["figcaption", "a", "p", "b", "i"].into_iter().collect();
    set.extend(INLINE_TAGS.iter().copied());
    set
});

/// Tags in the key must have at least one ancestor among the tags in the
/// value; orphans are unwrapped keeping their content.
pub static MUST_ANCESTORS_FOR_KEEP_CONTENT: LazyLock<HashMap<&'static str, HashSet<&'static str>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        map.insert("li", ["ul", "ol"].into_iter().collect());
        for tag in ["thead", "tfoot", "tbody", "th", "tr", "td"] {
            map.insert(tag, ["table"].into_iter().collect());
        }
        for tag in ["dt", "dd"] {
            map.insert(tag, ["dl"].into_iter().collect());
        }
        map
    });

/// Structural root -> one of its child tags. Renaming the root to the child
/// tag dissolves the structure: the incomplete-structure cleaner then
/// unwraps the orphaned pieces.
pub static MUST_ANCESTORS_FOR_KEEP_CONTENT_REVERSED: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        [("table", "tr"), ("ul", "li"), ("ol", "li"), ("dl", "dt")]
            .into_iter()
            .collect()
    });

/// Orphans of these tags are removed together with their content.
pub static MUST_ANCESTORS_FOR_DROP_CONTENT: LazyLock<HashMap<&'static str, HashSet<&'static str>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        map.insert("figcaption", ["figure"].into_iter().collect());
        map
    });

/// Phrasing content as defined by the HTML5 spec
/// (<https://html.spec.whatwg.org/#phrasing-content>), extended with a few
/// legacy HTML4 inline tags.
pub static PHRASING_CONTENT: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "abbr", "audio", "b", "bdi", "bdo", "br", "button", "canvas", "cite", "code",
        "data", "datalist", "del", "dfn", "em", "embed", "i", "iframe", "img", "input", "ins",
        "kbd", "label", "link", "map", "mark", "math", "meta", "meter", "noscript", "object",
        "output", "picture", "progress", "q", "ruby", "s", "samp", "script", "select", "slot",
        "small", "span", "strong", "sub", "sup", "svg", "template", "textarea", "time", "u",
        "var", "video", "wbr",
        // legacy inline
        "applet", "basefont", "font",
    ]
    .into_iter()
    .collect()
});

/// Every HTML tag known to this crate. Tags outside this set are treated as
/// phrasing content by default.
pub static HTML_UNIVERSE_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = [
        // document structure
        "html", "head", "body", "title", "base", "isindex", "style", "noscript",
        // sectioning and block-level
        "address", "article", "aside", "blockquote", "center", "details", "dialog", "div",
        "dl", "dt", "dd", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
        "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "main", "menu", "menuitem", "nav",
        "ol", "p", "pre", "section", "summary", "ul", "li", "dir",
        // tables
        "table", "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
        // forms
        "legend", "optgroup", "option", "keygen",
        // media and embedding
        "area", "param", "source", "track",
        // frames and other legacy
        "frame", "frameset", "noframes", "marquee", "blink", "layer", "nobr", "command",
        "tt", "big", "strike", "acronym",
        // annotations
        "rp", "rt", "rtc", "rb",
    ]
    .into_iter()
    .collect();
    set.extend(PHRASING_CONTENT.iter().copied());
    set.extend(ALLOWED_TAGS.iter().copied());
    set
});

/// Deprecated or synonymous tags and their replacements.
pub static TAG_TRANSLATIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| [("b", "strong"), ("i", "em"), ("tt", "code")].into_iter().collect());

/// Trusted embedding domains. Reserved for future embed-domain filtering;
/// nothing consumes this yet.
pub static HOST_WHITELIST: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["youtube.com", "instagram.com"].into_iter().collect());

/// Tags that count as content even when their subtree is empty.
pub static CONTENT_EVEN_IF_EMPTY: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = ["img"].into_iter().collect();
    set.extend(EMBEDDING_TAGS.iter().copied());
    set
});

/// Phrasing content is the text of the document plus the elements that mark
/// up that text at the intra-paragraph level. Unknown tags are considered
/// phrasing by default.
#[inline]
#[must_use]
pub fn is_phrasing_content(tag: &str) -> bool {
    PHRASING_CONTENT.contains(tag) || !HTML_UNIVERSE_TAGS.contains(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_tags_is_a_union() {
        assert!(ALLOWED_TAGS.contains("p"));
        assert!(ALLOWED_TAGS.contains("figure"));
        assert!(ALLOWED_TAGS.contains("figcaption"));
        assert!(ALLOWED_TAGS.contains("iframe"));
        assert!(ALLOWED_TAGS.contains("source"));
        assert!(!ALLOWED_TAGS.contains("div"));
        assert!(!ALLOWED_TAGS.contains("span"));
        assert!(!ALLOWED_TAGS.contains("script"));
    }

    #[test]
    fn phrasing_classification() {
        assert!(is_phrasing_content("span"));
        assert!(is_phrasing_content("em"));
        assert!(is_phrasing_content("br"));
        assert!(is_phrasing_content("img"));
        // unknown tags default to phrasing
        assert!(is_phrasing_content("invented"));
        // known non-phrasing tags, including legacy ones
        assert!(!is_phrasing_content("strike"));
        assert!(!is_phrasing_content("div"));
        assert!(!is_phrasing_content("figure"));
        assert!(!is_phrasing_content("figcaption"));
        assert!(!is_phrasing_content("table"));
    }

    #[test]
    fn ancestor_rules() {
        assert_eq!(
            MUST_ANCESTORS_FOR_KEEP_CONTENT["li"],
            ["ul", "ol"].into_iter().collect()
        );
        assert_eq!(
            MUST_ANCESTORS_FOR_KEEP_CONTENT["td"],
            ["table"].into_iter().collect()
        );
        assert_eq!(
            MUST_ANCESTORS_FOR_DROP_CONTENT["figcaption"],
            ["figure"].into_iter().collect()
        );
        assert!(!MUST_ANCESTORS_FOR_KEEP_CONTENT.contains_key("table"));
        assert!(!MUST_ANCESTORS_FOR_KEEP_CONTENT.contains_key("dl"));
    }

    #[test]
    fn dissolution_map() {
        assert_eq!(MUST_ANCESTORS_FOR_KEEP_CONTENT_REVERSED["table"], "tr");
        assert_eq!(MUST_ANCESTORS_FOR_KEEP_CONTENT_REVERSED["ul"], "li");
        assert_eq!(MUST_ANCESTORS_FOR_KEEP_CONTENT_REVERSED["ol"], "li");
        assert_eq!(MUST_ANCESTORS_FOR_KEEP_CONTENT_REVERSED["dl"], "dt");
    }

    #[test]
    fn can_be_empty_includes_embeddings() {
        for tag in ["img", "br", "dt", "dd", "td", "video", "iframe", "source"] {
            assert!(CAN_BE_EMPTY.contains(tag), "missing: {tag}");
        }
        assert!(!CAN_BE_EMPTY.contains("p"));
    }
}
