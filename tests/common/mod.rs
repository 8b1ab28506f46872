// tests/common/mod.rs
// In-memory page fetchers shared by the integration tests.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use room_price_watch::config::Settings;
use room_price_watch::fetch::PageFetcher;
use room_price_watch::source::default_specs;
use room_price_watch::PriceChecker;

/// Serves canned bodies by URL; unknown URLs fail like a DNS error.
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
}

impl MapFetcher {
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no route to {url}"))
    }
}

/// Panics for one URL, serves the rest from `inner`.
pub struct PanicOn {
    pub url: String,
    pub inner: MapFetcher,
}

#[async_trait]
impl PageFetcher for PanicOn {
    async fn fetch(&self, url: &str) -> Result<String> {
        if url == self.url {
            panic!("parser bug on {url}");
        }
        self.inner.fetch(url).await
    }
}

/// Sleeps before answering from `inner`: `default_delay` for every URL unless
/// `delays` names a different one.
pub struct DelayFetcher {
    pub inner: MapFetcher,
    pub default_delay: Duration,
    pub delays: HashMap<String, Duration>,
}

impl DelayFetcher {
    pub fn new(inner: MapFetcher, default_delay: Duration) -> Self {
        Self {
            inner,
            default_delay,
            delays: HashMap::new(),
        }
    }

    pub fn delay(mut self, url: &str, d: Duration) -> Self {
        self.delays.insert(url.to_string(), d);
        self
    }
}

#[async_trait]
impl PageFetcher for DelayFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let d = self.delays.get(url).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(d).await;
        self.inner.fetch(url).await
    }
}

/// URL of a built-in source by key.
pub fn url_of(key: &str) -> String {
    default_specs()
        .into_iter()
        .find(|s| s.key == key)
        .map(|s| s.url)
        .unwrap_or_else(|| panic!("unknown source key {key}"))
}

pub fn html(body: &str) -> String {
    format!("<html><head><title>t</title></head><body>{body}</body></html>")
}

/// Default settings (built-in table) over the given fetcher.
pub fn checker_with(fetcher: impl PageFetcher + 'static) -> PriceChecker {
    Settings::default()
        .build_checker_with(Arc::new(fetcher))
        .expect("default settings build")
}
