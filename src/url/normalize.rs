use crate::UrlError;
use url::Url;

/// Scheme prefixed to inputs that do not carry one
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Normalizes user input into an absolute, fetchable URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prefix `http://` when the input has no `scheme://`
/// 3. Parse the URL; reject if malformed
/// 4. Accept only HTTP and HTTPS schemes
/// 5. Require a host
/// 6. Remove fragment (everything after #)
///
/// Reachability is not checked.
///
/// # Examples
///
/// ```
/// use page_weight::url::normalize_input;
///
/// let url = normalize_input("example.com/page").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_input(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    // "localhost:8080" would otherwise parse with "localhost" as its scheme
    let candidate = if has_scheme(input) {
        input.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, input)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(strip_fragment(url))
}

/// Returns true if the input starts with `scheme://`
///
/// Only the text before the first `://` is checked, and it must be a scheme
/// token (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`). A URL carried in the
/// path or query of a schemeless input does not count.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Removes the fragment so that `a.png#x` and `a.png` share one identity
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
