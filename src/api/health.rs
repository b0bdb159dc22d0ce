use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// Reports whether the CMS answers its own health check within five seconds.
async fn health(State(state): State<Arc<AppState>>) -> Response {
    let timestamp = Utc::now();
    match state.ctx.cms().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "strapi": "connected",
                "environment": state.environment,
                "timestamp": timestamp,
            })),
        )
            .into_response(),
        Err(err) => {
            warn!(err = %err, "strapi health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "strapi": "disconnected",
                    "environment": state.environment,
                    "timestamp": timestamp,
                })),
            )
                .into_response()
        }
    }
}
