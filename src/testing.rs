//! In-memory proxies standing in for the network in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::PipelineConfig;
use crate::fetcher::{FetchError, HttpResponse, Transport};
use crate::retry::RetryPolicy;

/// Proxy JSON envelope wrapping `contents`.
pub fn envelope(contents: &str) -> String {
    serde_json::json!({ "contents": contents, "status": { "http_code": 200 } }).to_string()
}

/// Config with tiny retry budgets and no delays.
pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        proxy_endpoint: "https://proxy.test/get".to_string(),
        asset_retry: RetryPolicy::fixed(3, Duration::ZERO),
        page_retry: RetryPolicy::fixed(2, Duration::ZERO),
    }
}

#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Replays queued responses in order, then answers 500 forever.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<HttpResponse>>,
    calls: CallCounter,
}

impl ScriptedTransport {
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.queue.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, _url: &Url) -> Result<HttpResponse, FetchError> {
        self.calls.bump();
        let next = self.queue.lock().unwrap().pop_front();
        Ok(next.unwrap_or(HttpResponse {
            status: 500,
            body: String::new(),
        }))
    }
}

/// Serves a fixed set of target URLs through the proxy protocol; anything else is a 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeSite {
    pub fn with(mut self, target: &str, body: &str) -> Self {
        self.pages.insert(target.to_string(), body.to_string());
        self
    }

    /// Targets requested so far, in order, one entry per attempt.
    pub fn requested(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requested)
    }
}

#[async_trait]
impl Transport for FakeSite {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        let target = url
            .query_pairs()
            .find(|(k, _)| k == "url")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        self.requested.lock().unwrap().push(target.clone());

        Ok(match self.pages.get(&target) {
            Some(body) => HttpResponse {
                status: 200,
                body: envelope(body),
            },
            None => HttpResponse {
                status: 404,
                body: String::new(),
            },
        })
    }
}
