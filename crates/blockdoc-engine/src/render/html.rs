//! Escaping helpers shared by every block renderer.

use regex::Regex;
use std::sync::OnceLock;

/// Escape text for use as element content
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape a value for use inside a double-quoted attribute
pub fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Escape rich text while letting the editor's inline formatting through.
///
/// Only `b`, `i`, `em`, `strong`, `code`, `mark` and `a` survive. Anchors keep
/// a single `href` attribute and only when it points at an http(s), relative,
/// fragment or mailto target; anything else stays escaped.
pub fn inline(text: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

    let tag_regex = TAG_REGEX.get_or_init(|| {
        Regex::new(r"&lt;(/?)(b|i|em|strong|code|mark|a)&gt;").expect("Invalid inline tag regex")
    });
    let link_regex = LINK_REGEX.get_or_init(|| {
        Regex::new(r#"&lt;a href="((?:https?://|/|#|mailto:)[^"]*)"&gt;"#)
            .expect("Invalid inline link regex")
    });

    let escaped = escape(text);
    let with_tags = tag_regex.replace_all(&escaped, "<$1$2>");
    link_regex
        .replace_all(&with_tags, r#"<a href="$1">"#)
        .into_owned()
}

/// URLs the renderer is willing to put into `src`/`href` attributes
pub fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/')
}
