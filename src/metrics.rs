use anyhow::Result;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the probe/check series.
    pub fn init() -> Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("check_requests_total", "Check requests by report status.");
    describe_counter!(
        "probe_fetch_errors_total",
        "Source fetches that failed or timed out."
    );
    describe_counter!(
        "probe_extraction_miss_total",
        "Fetched pages with no usable price match."
    );
    describe_counter!("probe_price_found_total", "Fetched pages with a price.");
    describe_histogram!("probe_fetch_ms", "Source fetch time in milliseconds.");
}
