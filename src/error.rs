// src/error.rs
//! Errors that escape per-source isolation and fail the whole check.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("no sources configured")]
    EmptySources,
    #[error("duplicate source key '{0}'")]
    DuplicateKey(String),
    #[error("invalid price pattern for source '{key}': {reason}")]
    InvalidPattern { key: String, reason: String },
    #[error("probe task failed: {0}")]
    Probe(String),
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let body = json!({ "status": "error", "message": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn check_error_renders_as_500_json() {
        let resp = CheckError::Probe("task 3 was cancelled".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "probe task failed: task 3 was cancelled");
    }
}
