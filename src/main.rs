//! Room price watch — Binary Entrypoint
//! Boots the Axum HTTP server: `/api/check`, `/health`, `/metrics`.

use room_price_watch::{api, config::Settings, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up ROOM_WATCH_CONFIG_PATH / ROOM_WATCH_THRESHOLD.
    let _ = dotenvy::dotenv();

    let settings = Settings::load_default()?;
    let checker = settings.build_checker()?;
    tracing::info!(
        sources = checker.sources.len(),
        threshold = checker.threshold,
        timeout_secs = settings.probe_timeout().as_secs(),
        "price checker ready"
    );

    let metrics = Metrics::init()?;
    let router = api::create_router(AppState::new(checker)).merge(metrics.router());

    Ok(router.into())
}
