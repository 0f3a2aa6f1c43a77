//! State module for a single page-weight request
//!
//! Everything here is request-scoped: it is created when a request starts and
//! dropped when the report (or error) is returned.
//!
//! # Components
//!
//! - `RequestState`: Tracks the phase of a request (resolving, fetching, aggregating, etc.)
//! - `ResourceRef`: A categorized sub-resource URL discovered in the page
//! - `ResourceSet`: Ordered, deduplicated collection of `ResourceRef`s
//! - `FetchOutcome`: The measured size of one sub-resource

mod request_state;
mod resource;
mod resource_set;

// Re-export main types
pub use request_state::{RequestState, RequestTracker};
pub use resource::{
    decoded_base64_size, is_data_uri, FetchOutcome, InlineResource, ResourceCategory, ResourceRef,
};
pub use resource_set::ResourceSet;
