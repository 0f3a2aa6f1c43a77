//! Bounded-parallel fetch passes over a deduplicated resource list
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - One spawned task per resource, each under its own timeout
//! - Turning per-resource failures into zero-size outcomes
//! - Cooperative cancellation: dropping a pass aborts its in-flight tasks
//!
//! The input list is deduplicated before a pass starts, so workers never
//! share mutable state; results are collected at join.

use crate::config::FetcherConfig;
use crate::state::{FetchOutcome, ResourceRef};
use crate::weigher::fetcher::fetch_resource;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;
use url::Url;

/// A fetched stylesheet: its size outcome plus its text when the fetch succeeded
#[derive(Debug, Clone)]
pub struct FetchedStylesheet {
    pub outcome: FetchOutcome,
    pub text: Option<String>,
}

/// Fetches sub-resources concurrently with a bounded number of requests in flight
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    client: Client,

    /// Timeout applied to each resource independently
    timeout: Duration,

    /// Maximum number of requests in flight within one pass
    max_concurrent: usize,
}

impl ResourceFetcher {
    /// Creates a new fetcher
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `config` - Fetcher configuration (timeout and concurrency limit)
    pub fn new(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(config.resource_timeout_ms),
            max_concurrent: config.max_concurrent_fetches.max(1) as usize,
        }
    }

    /// Fetches every resource once and returns one outcome per URL
    ///
    /// Failures (transport errors, timeouts, non-2xx) are logged and yield a
    /// zero-size outcome marked failed; they never affect other resources.
    /// Completion order is irrelevant to the result.
    pub async fn fetch_all(&self, resources: &[ResourceRef]) -> HashMap<Url, FetchOutcome> {
        self.run_pass(resources, false)
            .await
            .into_iter()
            .map(|(outcome, _)| (outcome.resource.url.clone(), outcome))
            .collect()
    }

    /// Fetches stylesheets, keeping their text for `url()` discovery
    ///
    /// Results are returned in input order so that discovery order is stable.
    pub async fn fetch_stylesheets(&self, stylesheets: &[ResourceRef]) -> Vec<FetchedStylesheet> {
        let mut by_url: HashMap<Url, FetchedStylesheet> = self
            .run_pass(stylesheets, true)
            .await
            .into_iter()
            .map(|(outcome, body)| {
                let text = body.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
                (outcome.resource.url.clone(), FetchedStylesheet { outcome, text })
            })
            .collect();

        stylesheets
            .iter()
            .filter_map(|stylesheet| by_url.remove(&stylesheet.url))
            .collect()
    }

    /// Runs one bounded-parallel pass
    ///
    /// Every input resource gets exactly one outcome, including resources
    /// whose task panicked.
    async fn run_pass(
        &self,
        resources: &[ResourceRef],
        keep_body: bool,
    ) -> Vec<(FetchOutcome, Option<Vec<u8>>)> {
        if resources.is_empty() {
            return Vec::new();
        }

        tracing::debug!(
            "Fetching {} resources with up to {} in flight",
            resources.len(),
            self.max_concurrent
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for resource in resources.iter().cloned() {
            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.timeout;
            let span = tracing::debug_span!("resource", url = %resource.url);

            tasks.spawn(
                async move {
                    // Acquisition only fails once the semaphore is closed
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return (FetchOutcome::failure(resource), None);
                    };

                    match fetch_resource(&client, &resource.url, timeout, keep_body).await {
                        Ok(fetched) => {
                            tracing::trace!("Fetched {} bytes", fetched.size_bytes);
                            (FetchOutcome::success(resource, fetched.size_bytes), fetched.body)
                        }
                        Err(e) => {
                            tracing::warn!("Failed to fetch resource: {}", e);
                            (FetchOutcome::failure(resource), None)
                        }
                    }
                }
                .instrument(span),
            );
        }

        let mut results = Vec::with_capacity(resources.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Resource fetch task failed: {}", e),
            }
        }

        // A task that panicked left no outcome behind; count it as failed
        if results.len() < resources.len() {
            let done: Vec<Url> = results
                .iter()
                .map(|(outcome, _)| outcome.resource.url.clone())
                .collect();
            for resource in resources {
                if !done.contains(&resource.url) {
                    results.push((FetchOutcome::failure(resource.clone()), None));
                }
            }
        }

        results
    }
}
