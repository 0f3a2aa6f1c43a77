//! Configuration module for Page-Weight
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; [`Config::default`] is used when no file is given.
//!
//! # Example
//!
//! ```no_run
//! use page_weight::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("page-weight.toml")).unwrap();
//! println!("Resource timeout: {}ms", config.fetcher.resource_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, ReportConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
