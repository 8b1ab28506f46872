// src/probe.rs
//! One source: fetch -> page text -> price. Failures stay local to the source.

use metrics::{counter, histogram};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::extract::find_price;
use crate::fetch::PageFetcher;
use crate::html::page_text;
use crate::source::SourceConfig;

/// Shown in place of a price when a source could not be read.
pub const LOOKUP_FAILED: &str = "查詢失敗";

/// Outcome of probing one source. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResult {
    pub key: String,
    pub name: String,
    pub price: Option<u64>,
    pub display_text: String,
    /// `None` only when the fetch itself failed.
    pub link: Option<String>,
}

impl SourceResult {
    pub fn fetch_failed(source: &SourceConfig) -> Self {
        Self {
            key: source.key.clone(),
            name: source.name.clone(),
            price: None,
            display_text: LOOKUP_FAILED.to_string(),
            link: None,
        }
    }

    pub fn no_price(source: &SourceConfig) -> Self {
        Self {
            key: source.key.clone(),
            name: source.name.clone(),
            price: None,
            display_text: LOOKUP_FAILED.to_string(),
            link: Some(source.url.clone()),
        }
    }

    pub fn priced(source: &SourceConfig, price: u64, raw: String) -> Self {
        Self {
            key: source.key.clone(),
            name: source.name.clone(),
            price: Some(price),
            display_text: raw,
            link: Some(source.url.clone()),
        }
    }
}

/// Classify an already-fetched page body.
pub fn result_from_body(source: &SourceConfig, body: &str) -> SourceResult {
    let text = page_text(body);
    match find_price(&text, &source.pattern) {
        Some(m) => match m.price {
            Some(price) => {
                counter!("probe_price_found_total").increment(1);
                SourceResult::priced(source, price, m.raw)
            }
            None => {
                tracing::debug!(source = %source.name, matched = %m.raw, "price match has no digits");
                counter!("probe_extraction_miss_total").increment(1);
                SourceResult::no_price(source)
            }
        },
        None => {
            tracing::debug!(source = %source.name, "no price match in page");
            counter!("probe_extraction_miss_total").increment(1);
            SourceResult::no_price(source)
        }
    }
}

/// Probe one source. Never fails: fetch errors and timeouts degrade to
/// [`LOOKUP_FAILED`] with no link.
pub async fn probe(fetcher: &dyn PageFetcher, source: &SourceConfig, timeout: Duration) -> SourceResult {
    let t0 = Instant::now();
    let fetched = tokio::time::timeout(timeout, fetcher.fetch(&source.url)).await;
    histogram!("probe_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match fetched {
        Ok(Ok(body)) => result_from_body(source, &body),
        Ok(Err(e)) => {
            tracing::warn!(source = %source.name, error = ?e, "fetch failed");
            counter!("probe_fetch_errors_total").increment(1);
            SourceResult::fetch_failed(source)
        }
        Err(_) => {
            tracing::warn!(source = %source.name, timeout_ms = timeout.as_millis() as u64, "fetch timed out");
            counter!("probe_fetch_errors_total").increment(1);
            SourceResult::fetch_failed(source)
        }
    }
}
