use std::time::Duration;

use crate::retry::RetryPolicy;

/// CORS proxy that wraps the target URL and answers with a `{ "contents": ... }` envelope.
pub const DEFAULT_PROXY_ENDPOINT: &str = "https://api.allorigins.win/get";

pub const ASSET_MAX_ATTEMPTS: u32 = 15;
pub const ASSET_RETRY_DELAY_MS: u64 = 1000;

pub const PAGE_MAX_ATTEMPTS: u32 = 10;
pub const PAGE_RETRY_DELAY_MS: u64 = 2000;

/// Upper bound on a single proxy round-trip.
pub const ATTEMPT_TIMEOUT_SECS: u64 = 30;

/// An asset is recorded as an animation file above this confidence.
pub const ANIMATION_THRESHOLD: f64 = 60.0;
/// Generic (library-less) matches must score above this to count.
pub const GENERIC_MIN_SCORE: f64 = 20.0;
/// Generic matches never report more than this.
pub const GENERIC_MAX_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub proxy_endpoint: String,
    /// Per-resource retry used by the fetcher for stylesheets and scripts.
    pub asset_retry: RetryPolicy,
    /// Outer retry around fetching and parsing the root page.
    pub page_retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let timeout = Duration::from_secs(ATTEMPT_TIMEOUT_SECS);
        Self {
            proxy_endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            asset_retry: RetryPolicy::fixed(
                ASSET_MAX_ATTEMPTS,
                Duration::from_millis(ASSET_RETRY_DELAY_MS),
            )
            .with_attempt_timeout(timeout),
            page_retry: RetryPolicy::fixed(
                PAGE_MAX_ATTEMPTS,
                Duration::from_millis(PAGE_RETRY_DELAY_MS),
            ),
        }
    }
}

impl PipelineConfig {
    pub fn with_proxy(mut self, endpoint: impl Into<String>) -> Self {
        self.proxy_endpoint = endpoint.into();
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.asset_retry = self.asset_retry.with_attempt_timeout(timeout);
        self
    }
}
