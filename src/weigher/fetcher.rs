//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building HTTP clients with proper user agent strings
//! - Fetching the main document (fatal on failure)
//! - Fetching sub-resources (failures are reported, never fatal)
//! - Measuring bodies by summing streamed chunk lengths
//! - Error classification

use crate::config::Config;
use crate::{PageWeightError, ResourceFetchError};
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Connection establishment timeout shared by every request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// The main HTML document
#[derive(Debug, Clone)]
pub struct Document {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Raw (content-decoded) body bytes
    pub body: Vec<u8>,
}

impl Document {
    /// Number of body bytes received
    pub fn size_bytes(&self) -> u64 {
        self.body.len() as u64
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A measured sub-resource body
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Sum of all chunk lengths read
    pub size_bytes: u64,

    /// Body bytes, only retained when requested
    pub body: Option<Vec<u8>>,
}

/// Builds an HTTP client with proper configuration
///
/// Request timeouts are applied per call, not on the client, so that the
/// document and sub-resources can use different limits.
///
/// # Example
///
/// ```no_run
/// use page_weight::config::Config;
/// use page_weight::weigher::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let redirect = match config.fetcher.max_redirects {
        0 => Policy::none(),
        n => Policy::limited(n as usize),
    };

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the main document
///
/// Any transport error, timeout, or non-2xx status is fatal to the request.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The normalized document URL
/// * `timeout` - Deadline for the whole exchange, body included
pub async fn fetch_document(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<Document, PageWeightError> {
    let exchange = async {
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_document_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(PageWeightError::DocumentStatus {
                url: final_url.to_string(),
                status: status.as_u16(),
            });
        }

        let (_, body) = read_body(response, true)
            .await
            .map_err(|e| classify_document_error(url, e))?;

        Ok::<_, PageWeightError>(Document {
            url: final_url,
            status_code: status.as_u16(),
            body: body.unwrap_or_default(),
        })
    };

    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(PageWeightError::DocumentTimeout {
            url: url.to_string(),
        }),
    }
}

/// Fetches one sub-resource and measures its body
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The resource URL
/// * `timeout` - Deadline for this resource alone
/// * `keep_body` - Retain the body bytes (stylesheets need their content)
pub async fn fetch_resource(
    client: &Client,
    url: &Url,
    timeout: Duration,
    keep_body: bool,
) -> Result<FetchedBody, ResourceFetchError> {
    let exchange = async {
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_resource_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResourceFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let (size_bytes, body) = read_body(response, keep_body).await.map_err(|e| {
            if e.is_timeout() {
                ResourceFetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ResourceFetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok::<_, ResourceFetchError>(FetchedBody { size_bytes, body })
    };

    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(ResourceFetchError::Timeout {
            url: url.to_string(),
        }),
    }
}

/// Reads a response body chunk by chunk
///
/// The size is the sum of chunk lengths, so a missing or wrong
/// `Content-Length` header and chunked transfer encoding do not matter.
async fn read_body(
    mut response: Response,
    keep_body: bool,
) -> Result<(u64, Option<Vec<u8>>), reqwest::Error> {
    let mut size_bytes = 0u64;
    let mut buffer = keep_body.then(Vec::new);

    while let Some(chunk) = response.chunk().await? {
        size_bytes += chunk.len() as u64;
        if let Some(buffer) = buffer.as_mut() {
            buffer.extend_from_slice(&chunk);
        }
    }

    Ok((size_bytes, buffer))
}

/// Classifies a transport error on the main document
fn classify_document_error(url: &Url, error: reqwest::Error) -> PageWeightError {
    if error.is_timeout() {
        PageWeightError::DocumentTimeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        PageWeightError::DocumentFetch {
            url: url.to_string(),
            message: format!("Connection failed: {}", error),
        }
    } else {
        PageWeightError::DocumentFetch {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Classifies a transport error on a sub-resource
fn classify_resource_error(url: &Url, error: reqwest::Error) -> ResourceFetchError {
    if error.is_timeout() {
        ResourceFetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        ResourceFetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
