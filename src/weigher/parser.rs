//! HTML parser for extracting page resources
//!
//! This module handles parsing HTML content to enumerate everything the page
//! pulls in:
//! - Images (`<img src>`), stylesheets (`<link rel="stylesheet">`) and
//!   scripts (`<script src>`)
//! - Images declared in inline `<style>` blocks and `style` attributes
//! - Inline base64 images, sized without any network call

use crate::state::{is_data_uri, InlineResource, ResourceCategory, ResourceRef, ResourceSet};
use crate::url::resolve;
use crate::weigher::css::extract_css_urls;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Resources discovered in a page
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// URL of the document the resources were found in
    pub document_url: Url,

    /// Base used for resolving references in the document (`<base href>` aware)
    pub base_url: Url,

    /// Deduplicated fetchable resources in discovery order
    pub resources: ResourceSet,

    /// Data-URI images embedded in the document or its stylesheets
    pub inline: Vec<InlineResource>,
}

impl ExtractionResult {
    fn new(document_url: Url, base_url: Url) -> Self {
        Self {
            document_url,
            base_url,
            resources: ResourceSet::new(),
            inline: Vec::new(),
        }
    }

    pub fn images(&self) -> Vec<ResourceRef> {
        self.resources.by_category(ResourceCategory::Image)
    }

    pub fn css(&self) -> Vec<ResourceRef> {
        self.resources.by_category(ResourceCategory::Css)
    }

    pub fn js(&self) -> Vec<ResourceRef> {
        self.resources.by_category(ResourceCategory::Js)
    }

    pub fn external(&self) -> Vec<ResourceRef> {
        self.resources.external()
    }

    /// Decoded sizes of all inline resources
    pub fn inline_sizes_bytes(&self) -> Vec<u64> {
        self.inline.iter().map(|r| r.size_bytes).collect()
    }

    /// Adds the `url()` references found in `css` as images
    ///
    /// References resolve against `base`: the stylesheet's own URL for a
    /// fetched stylesheet, the document base for inline styles. Base64 image
    /// data URIs are counted as inline resources. URLs already known keep
    /// their first category.
    ///
    /// Returns the number of newly added fetchable resources.
    pub fn add_css_references(&mut self, css: &str, base: &Url) -> usize {
        let mut added = 0;

        for reference in extract_css_urls(css) {
            if is_data_uri(&reference) {
                if let Some(inline) = InlineResource::from_data_uri(&reference) {
                    self.inline.push(inline);
                }
                continue;
            }

            if let Some(url) = resolve(base, &reference) {
                let resource = ResourceRef::new(url, ResourceCategory::Image, &self.document_url);
                if self.resources.insert(resource) {
                    added += 1;
                }
            }
        }

        added
    }

    fn add_reference(&mut self, reference: &str, category: ResourceCategory) {
        if let Some(url) = resolve(&self.base_url, reference) {
            let resource = ResourceRef::new(url, category, &self.document_url);
            self.resources.insert(resource);
        }
    }
}

/// Parses HTML content and extracts the resources it references
///
/// # Extraction Rules
///
/// | Element | Attribute | Category |
/// |---------|-----------|----------|
/// | `<img>` | `src` | Image (or inline, for base64 data URIs) |
/// | `<link rel="stylesheet">` | `href` | Css |
/// | `<script>` | `src` | Js |
/// | `<style>` / `style=""` | `url(...)` | Image |
///
/// `<link>` elements whose `rel` does not contain the `stylesheet` token
/// (icons, preloads, canonical links) are ignored.
///
/// Element references are collected in document order, followed by inline
/// style references. Duplicate URLs keep the first category seen. Malformed
/// markup never fails: unparseable fragments are skipped.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `document_url` - The (post-redirect) URL the document was served from
///
/// # Example
///
/// ```
/// use page_weight::weigher::extract_resources;
/// use url::Url;
///
/// let html = r#"<html><img src="a.png"><script src="/app.js"></script></html>"#;
/// let document_url = Url::parse("https://example.com/").unwrap();
/// let extracted = extract_resources(html, &document_url);
/// assert_eq!(extracted.images().len(), 1);
/// assert_eq!(extracted.js().len(), 1);
/// ```
pub fn extract_resources(html: &str, document_url: &Url) -> ExtractionResult {
    let document = Html::parse_document(html);

    let base_url = extract_base_url(&document, document_url);
    let mut result = ExtractionResult::new(document_url.clone(), base_url);

    extract_element_references(&document, &mut result);
    extract_inline_styles(&document, &mut result);

    tracing::debug!(
        "Extracted {} resources ({} images, {} css, {} js, {} external) and {} inline images",
        result.resources.len(),
        result.images().len(),
        result.css().len(),
        result.js().len(),
        result.external().len(),
        result.inline.len()
    );

    result
}

/// Returns the `<base href>` target, or the document URL when absent
fn extract_base_url(document: &Html, document_url: &Url) -> Url {
    let Ok(base_selector) = Selector::parse("base[href]") else {
        return document_url.clone();
    };

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| resolve(document_url, href))
        .unwrap_or_else(|| document_url.clone())
}

/// Walks `img`, `link` and `script` elements in document order
fn extract_element_references(document: &Html, result: &mut ExtractionResult) {
    let Ok(selector) = Selector::parse("img[src], link[href], script[src]") else {
        return;
    };

    for element in document.select(&selector) {
        match element.value().name() {
            "img" => {
                if let Some(src) = element.value().attr("src") {
                    extract_image(src, result);
                }
            }
            "link" => {
                if !is_stylesheet_link(&element) {
                    continue;
                }
                if let Some(href) = element.value().attr("href") {
                    result.add_reference(href, ResourceCategory::Css);
                }
            }
            "script" => {
                if let Some(src) = element.value().attr("src") {
                    result.add_reference(src, ResourceCategory::Js);
                }
            }
            _ => {}
        }
    }
}

/// Handles an `<img src>` value, which may be a data URI
fn extract_image(src: &str, result: &mut ExtractionResult) {
    let src = src.trim();

    if is_data_uri(src) {
        match InlineResource::from_data_uri(src) {
            Some(inline) => result.inline.push(inline),
            None => tracing::debug!("Skipping non-base64 data URI image"),
        }
        return;
    }

    result.add_reference(src, ResourceCategory::Image);
}

/// Returns true if the element's `rel` token list contains `stylesheet`
fn is_stylesheet_link(element: &ElementRef) -> bool {
    element
        .value()
        .attr("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false)
}

/// Scans `<style>` blocks and `style` attributes for `url()` references
fn extract_inline_styles(document: &Html, result: &mut ExtractionResult) {
    let base = result.base_url.clone();

    if let Ok(style_selector) = Selector::parse("style") {
        for element in document.select(&style_selector) {
            let css: String = element.text().collect();
            result.add_css_references(&css, &base);
        }
    }

    if let Ok(attr_selector) = Selector::parse("[style]") {
        for element in document.select(&attr_selector) {
            if let Some(css) = element.value().attr("style") {
                result.add_css_references(css, &base);
            }
        }
    }
}
