//! Character encoding detection for byte input.
//!
//! Web pages declare their charset through `<meta charset="...">` or the
//! older `http-equiv` form. The declaration is sniffed from the head of the
//! byte stream and the document decoded to UTF-8 before parsing; invalid
//! sequences become replacement characters rather than errors.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// How many leading bytes are inspected for a charset declaration.
const SNIFF_WINDOW: usize = 1024;

#[allow(clippy::expect_used)]
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([a-zA-Z0-9._\-]+)"#).expect("valid regex")
});

/// Detect the declared encoding, defaulting to UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(SNIFF_WINDOW)];
    let head_str = String::from_utf8_lossy(head);
    CHARSET_RE
        .captures(&head_str)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode HTML bytes to a UTF-8 string using the declared encoding.
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
