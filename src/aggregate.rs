// src/aggregate.rs
//! # Aggregator
//! Fans out one probe per source, waits for all of them, then picks the
//! cheapest offer strictly under the threshold.
//!
//! Selection and report shaping are pure (`select_best`, `build_report`), the
//! async part only gathers `SourceResult`s.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use metrics::counter;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use std::time::Duration;

use crate::error::CheckError;
use crate::fetch::PageFetcher;
use crate::probe::{probe, SourceResult};
use crate::source::SourceSet;
use crate::timefmt::ReportClock;

pub const DEFAULT_THRESHOLD: u64 = 4000;
pub const DEFAULT_CURRENCY_PREFIX: &str = "NT$";

/// Final answer for one check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateReport {
    Available {
        platform: String,
        /// Already prefixed, e.g. `NT$3800`.
        price: String,
        link: Option<String>,
        time: String,
    },
    /// `(key, display_text)` for every source, in source order.
    Unavailable {
        sources: Vec<(String, String)>,
        time: String,
    },
}

impl AggregateReport {
    pub fn status(&self) -> &'static str {
        match self {
            AggregateReport::Available { .. } => "available",
            AggregateReport::Unavailable { .. } => "unavailable",
        }
    }

    pub fn time(&self) -> &str {
        match self {
            AggregateReport::Available { time, .. } | AggregateReport::Unavailable { time, .. } => time,
        }
    }
}

impl Serialize for AggregateReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AggregateReport::Available {
                platform,
                price,
                link,
                time,
            } => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("status", self.status())?;
                map.serialize_entry("platform", platform)?;
                map.serialize_entry("price", price)?;
                map.serialize_entry("link", link)?;
                map.serialize_entry("time", time)?;
                map.end()
            }
            AggregateReport::Unavailable { sources, time } => {
                let mut map = serializer.serialize_map(Some(sources.len() + 2))?;
                map.serialize_entry("status", self.status())?;
                for (key, text) in sources {
                    map.serialize_entry(key, text)?;
                }
                map.serialize_entry("time", time)?;
                map.end()
            }
        }
    }
}

/// Cheapest result with a price strictly below `threshold`.
/// Ties go to the earliest result in source order.
pub fn select_best(results: &[SourceResult], threshold: u64) -> Option<&SourceResult> {
    results
        .iter()
        .filter_map(|r| r.price.filter(|p| *p < threshold).map(|p| (p, r)))
        .fold(None, |best: Option<(u64, &SourceResult)>, (p, r)| match best {
            Some((bp, _)) if bp <= p => best,
            _ => Some((p, r)),
        })
        .map(|(_, r)| r)
}

/// Pure report construction from a complete set of results.
pub fn build_report(
    results: &[SourceResult],
    threshold: u64,
    currency_prefix: &str,
    time: String,
) -> AggregateReport {
    match select_best(results, threshold) {
        Some(best) => AggregateReport::Available {
            platform: best.name.clone(),
            price: format!("{}{}", currency_prefix, best.price.unwrap_or_default()),
            link: best.link.clone(),
            time,
        },
        None => AggregateReport::Unavailable {
            sources: results
                .iter()
                .map(|r| (r.key.clone(), r.display_text.clone()))
                .collect(),
            time,
        },
    }
}

/// Probe every source concurrently and wait for all of them.
/// Results come back in source order. A probe task that panics degrades to a
/// failed lookup for its own source; only a cancelled task fails the batch.
pub async fn probe_all(
    fetcher: Arc<dyn PageFetcher>,
    sources: &SourceSet,
    timeout: Duration,
) -> Result<Vec<SourceResult>, CheckError> {
    let handles = sources
        .as_slice()
        .iter()
        .cloned()
        .map(|source| {
            let fetcher = Arc::clone(&fetcher);
            tokio::spawn(async move { probe(fetcher.as_ref(), &source, timeout).await })
        })
        .collect::<Vec<_>>();

    let joined = join_all(handles).await;
    sources
        .as_slice()
        .iter()
        .zip(joined)
        .map(|(source, joined)| match joined {
            Ok(result) => Ok(result),
            Err(e) if e.is_panic() => {
                tracing::error!(source = %source.name, error = %e, "probe task panicked");
                counter!("probe_fetch_errors_total").increment(1);
                Ok(SourceResult::fetch_failed(source))
            }
            Err(e) => Err(CheckError::Probe(e.to_string())),
        })
        .collect()
}

/// Everything one check needs, shared across requests.
#[derive(Clone)]
pub struct PriceChecker {
    pub fetcher: Arc<dyn PageFetcher>,
    pub sources: SourceSet,
    pub threshold: u64,
    pub currency_prefix: String,
    pub probe_timeout: Duration,
    pub clock: ReportClock,
}

impl PriceChecker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, sources: SourceSet) -> Self {
        Self {
            fetcher,
            sources,
            threshold: DEFAULT_THRESHOLD,
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            probe_timeout: Duration::from_secs(crate::fetch::DEFAULT_TIMEOUT_SECS),
            clock: ReportClock::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_clock(mut self, clock: ReportClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_currency_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.currency_prefix = prefix.into();
        self
    }

    /// Run one check. `now` is captured by the caller at the start of handling
    /// and is the only timestamp in the report.
    pub async fn check(&self, now: DateTime<Utc>) -> Result<AggregateReport, CheckError> {
        let time = self.clock.format(now);
        let results = probe_all(Arc::clone(&self.fetcher), &self.sources, self.probe_timeout).await?;
        let report = build_report(&results, self.threshold, &self.currency_prefix, time);

        counter!("check_requests_total", "status" => report.status()).increment(1);
        match &report {
            AggregateReport::Available { platform, price, .. } => {
                tracing::info!(status = report.status(), %platform, %price, "check finished");
            }
            AggregateReport::Unavailable { .. } => {
                let priced = results.iter().filter(|r| r.price.is_some()).count();
                tracing::info!(status = report.status(), priced, total = results.len(), "check finished");
            }
        }
        Ok(report)
    }
}
