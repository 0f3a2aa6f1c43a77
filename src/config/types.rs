use serde::Deserialize;

/// Main configuration structure for Page-Weight
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub report: ReportConfig,
}

/// Fetching behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Timeout for the main document request (milliseconds)
    #[serde(rename = "document-timeout-ms")]
    pub document_timeout_ms: u64,

    /// Timeout applied to each sub-resource request (milliseconds)
    #[serde(rename = "resource-timeout-ms")]
    pub resource_timeout_ms: u64,

    /// Maximum number of sub-resource requests in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            document_timeout_ms: 10_000,
            resource_timeout_ms: 5_000,
            max_concurrent_fetches: 16,
            max_redirects: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Product name sent in the User-Agent header
    pub name: String,

    /// Product version sent in the User-Agent header
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "page-weight".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value (`name/version`)
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Report configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Include per-resource `{url, size}` lists in the report
    #[serde(rename = "include-breakdown")]
    pub include_breakdown: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_breakdown: true,
        }
    }
}
