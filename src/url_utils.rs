//! Link absolutization.
//!
//! Rewrites every URL-carrying attribute, each `srcset` candidate and the
//! CSS references inside `<style>` text against a base URL. URLs that fail
//! to resolve are skipped; a resolved value that still contains control
//! characters is retried with those characters stripped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::etree::{Document, NodeId};

/// Attributes whose whole value is a URL.
static LINK_ATTRS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "action", "archive", "background", "cite", "classid", "codebase", "data", "href",
        "longdesc", "profile", "src", "usemap", "dynsrc", "lowsrc",
    ]
    .into_iter()
    .collect()
});

#[allow(clippy::expect_used)]
static CSS_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)url\(([^)]*)\)").expect("valid regex"));

#[allow(clippy::expect_used)]
static CSS_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@import\s+"([^"]*)""#).expect("valid regex"));

/// Resolve every link in the document against `base_url`. Unparseable URLs
/// are left alone; a base URL that does not parse disables the pass.
pub fn make_links_absolute(doc: &mut Document, base_url: &str) {
    let Ok(base) = Url::parse(base_url) else { return };

    for node in doc.iter(doc.root()) {
        rewrite_attribute_links(doc, node, &base);

        if let Some(style) = doc.attr(node, "style").map(str::to_string) {
            let mut changed = false;
            let rewritten = rewrite_css(&base, &style, &mut changed);
            if changed {
                set_checked_attr(doc, node, "style", rewritten);
            }
        }
        if doc.tag(node) == "style" {
            if let Some(text) = doc.text(node).map(str::to_string) {
                let mut changed = false;
                let rewritten = rewrite_css(&base, &text, &mut changed);
                if changed {
                    doc.set_text(node, Some(rewritten));
                }
            }
        }
    }
}

fn rewrite_attribute_links(doc: &mut Document, node: NodeId, base: &Url) {
    let names: Vec<String> = doc.attrs(node).iter().map(|(name, _)| name.clone()).collect();
    for name in names {
        let Some(current) = doc.attr(node, &name).map(str::to_string) else { continue };
        if LINK_ATTRS.contains(name.as_str()) {
            if let Some(resolved) = resolve(base, &current) {
                if resolved != current {
                    set_checked_attr(doc, node, &name, resolved);
                }
            }
        } else if name == "srcset" {
            if let Some(rewritten) = rewrite_srcset(base, &current) {
                set_checked_attr(doc, node, &name, rewritten);
            }
        }
    }
}

/// Resolve one link the way a browser would, trimming surrounding
/// whitespace first. `None` when the combination does not parse.
fn resolve(base: &Url, link: &str) -> Option<String> {
    base.join(link.trim()).ok().map(|resolved| resolved.to_string())
}

/// Rewrite each `srcset` candidate URL, keeping descriptors. `None` when
/// nothing changed.
fn rewrite_srcset(base: &Url, value: &str) -> Option<String> {
    let mut changed = false;
    let candidates: Vec<String> = value
        .split(',')
        .filter(|candidate| !candidate.trim().is_empty())
        .map(|candidate| {
            let trimmed = candidate.trim();
            let mut parts = trimmed.splitn(2, char::is_whitespace);
            let link = parts.next().unwrap_or("");
            let descriptor = parts.next().map(str::trim);
            match resolve(base, link) {
                Some(resolved) if resolved != link => {
                    changed = true;
                    match descriptor {
                        Some(descriptor) => format!("{resolved} {descriptor}"),
                        None => resolved,
                    }
                }
                _ => trimmed.to_string(),
            }
        })
        .collect();
    changed.then(|| candidates.join(", "))
}

fn rewrite_css(base: &Url, css: &str, changed: &mut bool) -> String {
    let pass_one = CSS_URL_RE.replace_all(css, |caps: &Captures| {
        let link = caps[1].trim().trim_matches(|c| c == '\'' || c == '"').trim();
        match resolve(base, link) {
            Some(resolved) if resolved != link => {
                *changed = true;
                format!("url({resolved})")
            }
            _ => caps[0].to_string(),
        }
    });
    let pass_two = CSS_IMPORT_RE.replace_all(&pass_one, |caps: &Captures| {
        let link = caps[1].trim();
        match resolve(base, link) {
            Some(resolved) if resolved != link => {
                *changed = true;
                format!("@import \"{resolved}\"")
            }
            _ => caps[0].to_string(),
        }
    });
    pass_two.into_owned()
}

/// Set an attribute, stripping control characters when the value would not
/// round-trip through serialization.
fn set_checked_attr(doc: &mut Document, node: NodeId, name: &str, value: String) {
    if value.chars().any(char::is_control) {
        let stripped: String = value.chars().filter(|c| !c.is_control()).collect();
        doc.set_attr(node, name, &stripped);
    } else {
        doc.set_attr(node, name, &value);
    }
}
