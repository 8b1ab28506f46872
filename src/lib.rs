// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod metrics;
pub mod probe;
pub mod source;
pub mod timefmt;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{AggregateReport, PriceChecker};
pub use crate::api::{router, AppState};
pub use crate::error::CheckError;
pub use crate::probe::SourceResult;

use tracing_subscriber::EnvFilter;

/// Shared tracing setup for the binaries. `RUST_LOG` wins; otherwise
/// `room_price_watch=info,warn`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("room_price_watch=info,warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}
