use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::retry::RetryPolicy;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid proxy endpoint: {0}")]
    Proxy(#[from] url::ParseError),
    #[error("Network response was not ok (status: {0})")]
    Status(u16),
    #[error("No content received from proxy")]
    EmptyEnvelope,
    #[error("Malformed proxy response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// A broken proxy endpoint fails identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Proxy(_))
    }
}

/// Result of fetching one resource. Never an error: failures are carried in `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn ok(content: String) -> Self {
        Self {
            success: true,
            content,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<String, String> {
        if self.success {
            Ok(self.content)
        } else {
            Err(self.error.unwrap_or_else(|| "unknown fetch error".to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// One HTTP GET. The seam between the pipeline and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

/// Fetches arbitrary URLs through the CORS proxy with a fixed-delay retry.
pub struct Fetcher<T> {
    transport: T,
    proxy_endpoint: String,
    policy: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, proxy_endpoint: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            proxy_endpoint: proxy_endpoint.into(),
            policy,
        }
    }

    /// `<proxy>?url=<encoded target>`
    pub fn proxy_url(&self, target: &str) -> Result<Url, FetchError> {
        Ok(Url::parse_with_params(&self.proxy_endpoint, &[("url", target)])?)
    }

    async fn fetch_once(&self, target: &str) -> Result<String, FetchError> {
        let url = self.proxy_url(target)?;
        let response = self.transport.get(&url).await?;
        if !(200..300).contains(&response.status) {
            return Err(FetchError::Status(response.status));
        }
        let envelope: ProxyEnvelope = serde_json::from_str(&response.body)?;
        envelope
            .contents
            .filter(|c| !c.is_empty())
            .ok_or(FetchError::EmptyEnvelope)
    }

    /// Fetch with the fetcher's own policy (15 attempts, 1s apart by default).
    pub async fn fetch_with_retry(&self, target: &str) -> FetchOutcome {
        self.fetch_with_policy(target, &self.policy).await
    }

    pub async fn fetch_with_policy(&self, target: &str, policy: &RetryPolicy) -> FetchOutcome {
        let result = policy
            .run(target, |_| self.fetch_once(target), FetchError::is_retryable)
            .await;
        match result {
            Ok(content) => {
                debug!("Fetched {} ({} bytes)", target, content.len());
                FetchOutcome::ok(content)
            }
            Err(e) => {
                warn!("Giving up on {} after {} attempt(s): {}", target, e.attempts, e.last);
                FetchOutcome::failed(e.last.to_string())
            }
        }
    }
}
