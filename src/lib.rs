//! Page-Weight: estimates the total network weight of a web page
//!
//! This crate fetches a page's HTML, discovers every embedded sub-resource
//! (images, stylesheets, scripts, CSS-declared images and inline base64
//! images), fetches each sub-resource concurrently and reports the aggregate
//! size broken down by category.

pub mod config;
pub mod output;
pub mod state;
pub mod url;
pub mod weigher;

use serde::Serialize;
use thiserror::Error;

/// Main error type for Page-Weight operations
///
/// Only `InvalidInput` and the `Document*` variants are produced by a normal
/// request; every sub-resource failure is absorbed by the fetcher.
#[derive(Debug, Error)]
pub enum PageWeightError {
    #[error("URL is required")]
    InvalidInput,

    #[error("Failed to fetch {url}: {message}")]
    DocumentFetch { url: String, message: String },

    #[error("Request timeout for {url}")]
    DocumentTimeout { url: String },

    #[error("HTTP {status} for {url}")]
    DocumentStatus { url: String, status: u16 },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RequestState,
        to: state::RequestState,
    },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller supplied a missing or unusable URL
    BadInput,
    /// The main document could not be retrieved
    UpstreamFetch,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Transport-level status code a routing layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadInput => 400,
            Self::UpstreamFetch => 502,
            Self::Internal => 500,
        }
    }
}

impl PageWeightError {
    /// Returns the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput | Self::Url(_) => ErrorKind::BadInput,
            Self::DocumentFetch { .. }
            | Self::DocumentTimeout { .. }
            | Self::DocumentStatus { .. } => ErrorKind::UpstreamFetch,
            Self::InvalidTransition { .. }
            | Self::Config(_)
            | Self::HttpClient(_)
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Per-resource fetch failures
///
/// These never leave the fetcher; they are logged and turned into a
/// zero-size [`state::FetchOutcome`].
#[derive(Debug, Error)]
pub enum ResourceFetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Result type alias for Page-Weight operations
pub type Result<T> = std::result::Result<T, PageWeightError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::output::{aggregate, ErrorResponse, PageWeightReport, PageWeightResponse};
pub use crate::state::{FetchOutcome, RequestState, ResourceCategory, ResourceRef};
pub use crate::url::{normalize_input, resolve};
pub use crate::weigher::{compute_page_weight, PageWeightService};
