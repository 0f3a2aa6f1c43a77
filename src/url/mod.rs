//! URL handling module for Page-Weight
//!
//! This module normalizes user input into a fetchable URL, resolves resource
//! references against a base URL, and decides whether a resource is external
//! to the document it was found in.

mod domain;
mod normalize;

use url::Url;

// Re-export main functions
pub use domain::{extract_authority, is_external};
pub use normalize::{normalize_input, strip_fragment};

/// Resolves a resource reference against a base URL
///
/// Resolution follows RFC 3986 (`Url::join`). The fragment is removed from
/// the result so that it can be used as a deduplication key.
///
/// Returns None if the reference should not be fetched:
/// - empty or fragment-only references
/// - `javascript:`, `mailto:`, `tel:`, `about:` and `data:` schemes
/// - references that fail to parse
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use page_weight::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post.html").unwrap();
/// let url = resolve(&base, "../img/a.png").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/img/a.png");
/// ```
pub fn resolve(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let lowered = reference.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "about:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    match base.join(reference) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(strip_fragment(absolute))
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Skipping unresolvable reference {:?}: {}", reference, e);
            None
        }
    }
}
