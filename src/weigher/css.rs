//! Lexical scan of CSS text for `url()` references
//!
//! This is not a CSS parser. It finds `url(...)` tokens, optionally quoted
//! with `"` or `'`, after dropping `/* ... */` comments. Escaped quotes inside
//! a URL and other exotic syntax are handled on a best-effort basis only.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"')]*))\s*\)"#)
        .unwrap()
});

/// Returns every `url()` reference in `css`, in source order
///
/// References are returned as written (trimmed), not resolved. Empty
/// references such as `url()` or `url("")` are dropped.
///
/// # Example
///
/// ```
/// use page_weight::weigher::extract_css_urls;
///
/// let css = r#"body { background: url('bg.jpg') } .a { background-image: url(a.png), url("b.png") }"#;
/// assert_eq!(extract_css_urls(css), vec!["bg.jpg", "a.png", "b.png"]);
/// ```
pub fn extract_css_urls(css: &str) -> Vec<String> {
    let without_comments = COMMENT_RE.replace_all(css, "");

    URL_RE
        .captures_iter(&without_comments)
        .filter_map(|cap| {
            cap.name("dq")
                .or_else(|| cap.name("sq"))
                .or_else(|| cap.name("bare"))
        })
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
