use crate::url::is_external;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use url::Url;

/// Category a resource size is bucketed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// `<img src>` and CSS-declared images
    Image,
    /// `<link rel="stylesheet" href>`
    Css,
    /// `<script src>`
    Js,
    /// Overlay bucket for resources on another authority; never a primary category
    External,
    /// Base64 data-URI images embedded in the page
    InlineImage,
}

impl ResourceCategory {
    /// Returns true for categories that are fetched and summed into the total
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Image | Self::Css | Self::Js)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "Images",
            Self::Css => "CSS",
            Self::Js => "JavaScript",
            Self::External => "External",
            Self::InlineImage => "Inline images",
        }
    }
}

/// A sub-resource to fetch
///
/// Identity is the normalized absolute URL alone: two references to the same
/// URL compare equal whatever their category.
#[derive(Debug, Clone)]
pub struct ResourceRef {
    /// Absolute URL, fragment removed
    pub url: Url,

    /// Primary category (`Image`, `Css` or `Js`)
    pub category: ResourceCategory,

    /// True if the URL's authority differs from the document's
    pub external: bool,
}

impl ResourceRef {
    /// Creates a reference, tagging it external relative to `document`
    pub fn new(url: Url, category: ResourceCategory, document: &Url) -> Self {
        debug_assert!(
            category.is_fetched(),
            "{:?} is not a primary fetch category",
            category
        );
        let external = is_external(document, &url);
        Self {
            url,
            category,
            external,
        }
    }
}

impl PartialEq for ResourceRef {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for ResourceRef {}

impl Hash for ResourceRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

/// A resource embedded in the page as a data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineResource {
    /// Declared media type, e.g. `image/png`
    pub media_type: String,

    /// Decoded payload size in bytes
    pub size_bytes: u64,
}

impl InlineResource {
    /// Parses a `data:image/...;base64,` URI
    ///
    /// Returns None for anything that is not a base64 image data URI. The size
    /// is `floor(len(payload) * 3 / 4)`; padding is not subtracted.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let uri = uri.trim();
        if !is_data_uri(uri) {
            return None;
        }
        let (meta, payload) = uri[5..].split_once(',')?;

        let mut params = meta.split(';').map(str::trim);
        let media_type = params.next()?.to_ascii_lowercase();
        if !media_type.starts_with("image/") {
            return None;
        }
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return None;
        }

        Some(Self {
            media_type,
            size_bytes: decoded_base64_size(payload),
        })
    }
}

/// Returns true if `s` starts with the `data:` scheme (case-insensitive)
pub fn is_data_uri(s: &str) -> bool {
    s.get(..5)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Size of the data a base64 payload decodes to
pub fn decoded_base64_size(payload: &str) -> u64 {
    (payload.len() as u64 * 3) / 4
}

/// Result of fetching one sub-resource
///
/// Created once per unique `ResourceRef`; a failed fetch carries size 0.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub resource: ResourceRef,
    pub size_bytes: u64,
    pub failed: bool,
}

impl FetchOutcome {
    /// Outcome for a successfully read body of `size_bytes`
    pub fn success(resource: ResourceRef, size_bytes: u64) -> Self {
        Self {
            resource,
            size_bytes,
            failed: false,
        }
    }

    /// Zero-size outcome for a failed fetch
    pub fn failure(resource: ResourceRef) -> Self {
        Self {
            resource,
            size_bytes: 0,
            failed: true,
        }
    }
}
