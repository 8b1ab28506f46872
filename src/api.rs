use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use tower_http::cors::CorsLayer;

use crate::aggregate::PriceChecker;

#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<PriceChecker>,
}

impl AppState {
    pub fn new(checker: PriceChecker) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/check", get(check))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Alias kept so callers can write `room_price_watch::router(state)`.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    match state.checker.check(now).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "/api/check failed");
            e.into_response()
        }
    }
}
