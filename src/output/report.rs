//! Page weight report and size aggregation
//!
//! All `*_size_mb` fields are derived from byte sums at construction time.
//! Each field is rounded independently, so the category values need not add
//! up to `total_size_mb`; that drift is expected.

use crate::state::{FetchOutcome, ResourceCategory};
use serde::Serialize;

/// Bytes per reported megabyte
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Converts bytes to megabytes rounded to two decimals
///
/// # Examples
///
/// ```
/// use page_weight::output::bytes_to_mb;
///
/// assert_eq!(bytes_to_mb(1_572_864), 1.5);
/// assert_eq!(bytes_to_mb(1024), 0.0);
/// ```
pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}

/// Raw byte sums behind the reported megabyte values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ByteTotals {
    pub html: u64,
    pub images: u64,
    pub css: u64,
    pub js: u64,
    /// Overlay: already included in images/css/js, never added to `total`
    pub external: u64,
    pub inline: u64,
    pub total: u64,
}

/// One fetched resource in the per-resource breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub url: String,
    /// Bytes received; 0 when the fetch failed
    pub size: u64,
}

/// Per-resource lists, each sorted by URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceBreakdown {
    pub images: Vec<ResourceEntry>,
    pub css: Vec<ResourceEntry>,
    pub js: Vec<ResourceEntry>,
    pub external_resources: Vec<ResourceEntry>,
}

/// Final weight report for one page
///
/// Immutable once built by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWeightReport {
    html_size_mb: f64,
    images_size_mb: f64,
    css_size_mb: f64,
    js_size_mb: f64,
    external_size_mb: f64,
    total_size_mb: f64,
    failed_resources: usize,
    bytes: ByteTotals,
    #[serde(flatten)]
    breakdown: Option<ResourceBreakdown>,
}

impl PageWeightReport {
    pub fn html_size_mb(&self) -> f64 {
        self.html_size_mb
    }

    pub fn images_size_mb(&self) -> f64 {
        self.images_size_mb
    }

    pub fn css_size_mb(&self) -> f64 {
        self.css_size_mb
    }

    pub fn js_size_mb(&self) -> f64 {
        self.js_size_mb
    }

    pub fn external_size_mb(&self) -> f64 {
        self.external_size_mb
    }

    pub fn total_size_mb(&self) -> f64 {
        self.total_size_mb
    }

    /// Number of sub-resources that could not be fetched
    pub fn failed_resources(&self) -> usize {
        self.failed_resources
    }

    pub fn bytes(&self) -> &ByteTotals {
        &self.bytes
    }

    pub fn breakdown(&self) -> Option<&ResourceBreakdown> {
        self.breakdown.as_ref()
    }
}

/// Combines document, inline and fetched sizes into a report
///
/// `total = html + sum(inline) + sum(successful image/css/js outcomes)`.
/// External resources are an overlay: they are summed into
/// `external_size_mb` for information but are already counted in their
/// primary category, so they are not added to the total again. Failed
/// outcomes contribute zero but stay listed in the breakdown.
///
/// # Arguments
///
/// * `html_bytes` - Size of the main document body
/// * `inline_bytes` - Decoded sizes of inline (data URI) resources
/// * `outcomes` - One outcome per unique fetched resource
/// * `include_breakdown` - Attach per-resource lists
pub fn aggregate(
    html_bytes: u64,
    inline_bytes: &[u64],
    outcomes: &[FetchOutcome],
    include_breakdown: bool,
) -> PageWeightReport {
    let mut bytes = ByteTotals {
        html: html_bytes,
        inline: inline_bytes.iter().sum(),
        ..ByteTotals::default()
    };
    let mut breakdown = ResourceBreakdown::default();
    let mut failed_resources = 0;

    for outcome in outcomes {
        // Failed outcomes already carry size 0
        let size = if outcome.failed { 0 } else { outcome.size_bytes };
        if outcome.failed {
            failed_resources += 1;
        }

        let entry = ResourceEntry {
            url: outcome.resource.url.to_string(),
            size,
        };

        match outcome.resource.category {
            ResourceCategory::Image => {
                bytes.images += size;
                breakdown.images.push(entry.clone());
            }
            ResourceCategory::Css => {
                bytes.css += size;
                breakdown.css.push(entry.clone());
            }
            ResourceCategory::Js => {
                bytes.js += size;
                breakdown.js.push(entry.clone());
            }
            ResourceCategory::External | ResourceCategory::InlineImage => {
                tracing::warn!(
                    "Ignoring outcome with non-fetch category {:?}: {}",
                    outcome.resource.category,
                    entry.url
                );
                continue;
            }
        }

        if outcome.resource.external {
            bytes.external += size;
            breakdown.external_resources.push(entry);
        }
    }

    bytes.total = bytes.html + bytes.inline + bytes.images + bytes.css + bytes.js;

    // External is an overlay and must never leak into the total
    debug_assert_eq!(
        bytes.images + bytes.css + bytes.js,
        bytes.total - bytes.html - bytes.inline
    );

    let breakdown = include_breakdown.then(|| {
        for list in [
            &mut breakdown.images,
            &mut breakdown.css,
            &mut breakdown.js,
            &mut breakdown.external_resources,
        ] {
            list.sort_by(|a, b| a.url.cmp(&b.url));
        }
        breakdown
    });

    PageWeightReport {
        html_size_mb: bytes_to_mb(bytes.html),
        images_size_mb: bytes_to_mb(bytes.images),
        css_size_mb: bytes_to_mb(bytes.css),
        js_size_mb: bytes_to_mb(bytes.js),
        external_size_mb: bytes_to_mb(bytes.external),
        total_size_mb: bytes_to_mb(bytes.total),
        failed_resources,
        bytes,
        breakdown,
    }
}
