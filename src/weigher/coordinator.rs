//! Page weight coordinator - per-request orchestration
//!
//! One call to [`PageWeightService::compute`] drives a request through:
//! - Input validation and URL normalization
//! - Fetching the main document (fatal on failure)
//! - Resource extraction from the HTML
//! - A stylesheet pass, whose bodies are scanned for `url()` references
//! - A pass over every remaining image and script
//! - Aggregation into a [`PageWeightReport`]
//!
//! Dropping the returned future cancels the request, including any
//! in-flight sub-resource fetches.

use crate::config::{validate, Config};
use crate::output::{aggregate, PageWeightReport};
use crate::state::{FetchOutcome, RequestState, RequestTracker};
use crate::url::normalize_input;
use crate::weigher::fetcher::{build_http_client, fetch_document};
use crate::weigher::parser::extract_resources;
use crate::weigher::scheduler::ResourceFetcher;
use crate::{PageWeightError, UrlError};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Computes page weights with a shared HTTP client
///
/// The service holds no per-request state and can serve concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct PageWeightService {
    config: Arc<Config>,
    client: Client,
    fetcher: ResourceFetcher,
}

impl PageWeightService {
    /// Creates a new service
    ///
    /// # Arguments
    ///
    /// * `config` - Validated before use
    ///
    /// # Returns
    ///
    /// * `Ok(PageWeightService)` - Ready to serve requests
    /// * `Err(PageWeightError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, PageWeightError> {
        validate(&config)?;

        let client = build_http_client(&config)?;
        let fetcher = ResourceFetcher::new(client.clone(), &config.fetcher);

        Ok(Self {
            config: Arc::new(config),
            client,
            fetcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes the weight of the page at `input`
    ///
    /// Sub-resource failures never fail the request: they count as zero
    /// bytes and are listed in the report. Only bad input and a failure to
    /// retrieve the main document produce an error.
    pub async fn compute(&self, input: &str) -> Result<PageWeightReport, PageWeightError> {
        let span = tracing::info_span!("page_weight", url = %input.trim());

        async move {
            let mut tracker = RequestTracker::new();

            match self.run(input, &mut tracker).await {
                Ok(report) => {
                    tracing::info!(
                        "Page weight {:.2} MB ({} bytes, {} failed resources) in {:?}",
                        report.total_size_mb(),
                        report.bytes().total,
                        report.failed_resources(),
                        tracker.elapsed()
                    );
                    Ok(report)
                }
                Err(e) => {
                    tracing::warn!(
                        "Request failed while {} after {:?}: {}",
                        tracker.state(),
                        tracker.elapsed(),
                        e
                    );
                    tracker.fail();
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        input: &str,
        tracker: &mut RequestTracker,
    ) -> Result<PageWeightReport, PageWeightError> {
        if input.trim().is_empty() {
            return Err(PageWeightError::InvalidInput);
        }

        tracker.advance(RequestState::ResolvingUrl)?;
        let url = normalize_input(input).map_err(|e| match e {
            UrlError::Empty => PageWeightError::InvalidInput,
            other => PageWeightError::Url(other),
        })?;
        tracing::debug!("Normalized input to {}", url);

        tracker.advance(RequestState::FetchingDocument)?;
        let timeout = Duration::from_millis(self.config.fetcher.document_timeout_ms);
        let document = fetch_document(&self.client, &url, timeout).await?;
        if document.url != url {
            tracing::debug!("Redirected to {}", document.url);
        }

        tracker.advance(RequestState::Extracting)?;
        let mut extracted = extract_resources(&document.text(), &document.url);

        let mut outcomes: HashMap<Url, FetchOutcome> = HashMap::new();

        let (stylesheets, _) = extracted.resources.partition_css();
        if !stylesheets.is_empty() {
            tracker.advance(RequestState::FetchingCss)?;
            for stylesheet in self.fetcher.fetch_stylesheets(&stylesheets).await {
                if let Some(text) = &stylesheet.text {
                    let added =
                        extracted.add_css_references(text, &stylesheet.outcome.resource.url);
                    tracing::debug!(
                        "Found {} new references in {}",
                        added,
                        stylesheet.outcome.resource.url
                    );
                }
                outcomes.insert(stylesheet.outcome.resource.url.clone(), stylesheet.outcome);
            }
        }

        tracker.advance(RequestState::FetchingResources)?;
        let (_, remaining) = extracted.resources.partition_css();
        outcomes.extend(self.fetcher.fetch_all(&remaining).await);

        tracker.advance(RequestState::Aggregating)?;
        // One outcome per unique resource, in discovery order
        let ordered: Vec<FetchOutcome> = extracted
            .resources
            .iter()
            .map(|resource| {
                outcomes
                    .remove(&resource.url)
                    .unwrap_or_else(|| FetchOutcome::failure(resource.clone()))
            })
            .collect();

        let report = aggregate(
            document.size_bytes(),
            &extracted.inline_sizes_bytes(),
            &ordered,
            self.config.report.include_breakdown,
        );

        tracker.advance(RequestState::Done)?;
        Ok(report)
    }
}

/// Computes the weight of one page with a throwaway service
///
/// # Example
///
/// ```no_run
/// use page_weight::{compute_page_weight, Config};
///
/// # async fn run() -> Result<(), page_weight::PageWeightError> {
/// let report = compute_page_weight(Config::default(), "example.com").await?;
/// println!("{} MB", report.total_size_mb());
/// # Ok(())
/// # }
/// ```
pub async fn compute_page_weight(
    config: Config,
    url: &str,
) -> Result<PageWeightReport, PageWeightError> {
    PageWeightService::new(config)?.compute(url).await
}
