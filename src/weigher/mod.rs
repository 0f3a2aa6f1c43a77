//! Weigher module for measuring a page and its sub-resources
//!
//! This module contains the core measurement logic, including:
//! - HTTP fetching of the document and sub-resources
//! - HTML parsing and resource extraction
//! - CSS `url()` discovery
//! - Bounded-parallel fetch passes
//! - Overall request coordination

mod coordinator;
mod css;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{compute_page_weight, PageWeightService};
pub use css::extract_css_urls;
pub use fetcher::{build_http_client, fetch_document, fetch_resource, Document, FetchedBody};
pub use parser::{extract_resources, ExtractionResult};
pub use scheduler::{FetchedStylesheet, ResourceFetcher};
