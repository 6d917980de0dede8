//! Text helpers exposed to templates through [`RenderContext`](super::RenderContext).
//!
//! The helpers work on MiniJinja values so templates can pass anything in;
//! non-string input is stringified first.

use minijinja::value::{Value, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// `scheme://host[:port][/path][?query]`, matched against unescaped text.
///
/// A URI never ends in a full stop, and never includes quotes or angle
/// brackets, so `"http://x/y"` and `<http://x/y>` link only the URI.
static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[A-Za-z]+?://([-\w.]+[-\w])+(:\d+)?(/([\w/.#-]*(\?[^\s"'<>]+)?[^.\s"'<>])?)?"#)
        .expect("URI pattern is valid")
});

/// Stringifies a template value. `none` and undefined become the empty string.
pub fn to_text(value: &Value) -> String {
    match value.kind() {
        ValueKind::Undefined | ValueKind::None => String::new(),
        _ => match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        },
    }
}

/// HTML-escapes `<`, `>`, `&`, `"` and `'`.
///
/// # Example
///
/// ```rust
/// use pretty_page::template::helpers::escape;
///
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("it's \"fine\" & done"), "it&#039;s &quot;fine&quot; &amp; done");
/// ```
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes like [`escape`] and turns URIs into anchors opening in a new tab.
///
/// URIs are found in the raw text; the text between them and each URI are
/// escaped separately.
///
/// # Example
///
/// ```rust
/// use pretty_page::template::helpers::escape_but_preserve_uris;
///
/// assert_eq!(
///     escape_but_preserve_uris("see http://example.com/x for <info>"),
///     "see <a href=\"http://example.com/x\" target=\"_blank\">http://example.com/x</a> for &lt;info&gt;",
/// );
/// ```
pub fn escape_but_preserve_uris(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for uri in URI_PATTERN.find_iter(raw) {
        out.push_str(&escape(&raw[last..uri.start()]));
        let escaped = escape(uri.as_str());
        out.push_str(&format!(
            r#"<a href="{}" target="_blank">{}</a>"#,
            escaped, escaped
        ));
        last = uri.end();
    }
    out.push_str(&escape(&raw[last..]));
    out
}

/// Builds a URL/anchor friendly slug.
///
/// Spaces become hyphens, anything that is not an ASCII letter, digit, hyphen
/// or underscore is dropped, and the result is lower-cased.
///
/// # Example
///
/// ```rust
/// use pretty_page::template::helpers::slug;
///
/// assert_eq!(slug("Hello, World! 123"), "hello-world-123");
/// ```
pub fn slug(original: &str) -> String {
    original
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Returns `value` when it is truthy, `fallback` otherwise.
///
/// Truthiness follows MiniJinja: empty strings, zero, `none`, undefined and
/// empty collections are all falsy.
pub fn pick(value: Value, fallback: Value) -> Value {
    if value.is_true() {
        value
    } else {
        fallback
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn slug_only_emits_slug_alphabet(input in ".{0,64}") {
            let out = slug(&input);
            prop_assert!(out
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'));
        }

        #[test]
        fn escape_leaves_no_raw_metacharacters(input in ".{0,64}") {
            let out = escape(&input);
            prop_assert!(!out.contains('<'));
            prop_assert!(!out.contains('>'));
            prop_assert!(!out.contains('"'));
            prop_assert!(!out.contains('\''));
        }

        #[test]
        fn escape_uris_leaves_no_raw_quotes(input in "[a-z :/.\"'<>&]{0,64}") {
            let out = escape_but_preserve_uris(&input);
            // Only the generated anchor markup may carry raw quotes.
            let stripped = out.replace(r#"" target="_blank">"#, "").replace(r#"<a href=""#, "");
            prop_assert!(!stripped.contains('"'));
            prop_assert!(!stripped.contains('\''));
        }
    }
}
