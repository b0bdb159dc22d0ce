// Route tree: one router per content area, merged here.
pub mod blog;
pub mod faqs;
pub mod forms;
pub mod health;
pub mod programs;
pub mod site;

use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::error::GatewayError;
use crate::resources::FetchContext;
use crate::strapi::Locale;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Shared, read-only request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ctx: FetchContext,
    pub default_locale: Locale,
    pub environment: String,
}

impl AppState {
    pub fn new(ctx: FetchContext, cfg: &Config) -> Self {
        Self {
            ctx,
            default_locale: cfg.content.default_locale,
            environment: cfg.server.environment.clone(),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(blog::router())
        .merge(programs::router())
        .merge(faqs::router())
        .merge(site::router())
        .merge(forms::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("no route for {}", uri.path()),
    )
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let error = status.canonical_reason().unwrap_or("Error");
    (
        status,
        Json(json!({ "error": error, "message": message.into() })),
    )
        .into_response()
}

/// Error mapping for single-record endpoints.
pub(crate) fn detail_error(err: GatewayError) -> Response {
    match err {
        GatewayError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
        GatewayError::Invalid(message) => error_response(StatusCode::BAD_REQUEST, message),
        other => {
            warn!(err = %other, "detail lookup failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch content from the CMS",
            )
        }
    }
}

/// Query string shared by list endpoints. Values stay strings so a malformed
/// number degrades to its default instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub locale: Option<String>,
    pub category: Option<String>,
    pub grade: Option<String>,
    #[serde(rename = "programType", alias = "program_type")]
    pub program_type: Option<String>,
    pub country: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| *l > 0)
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Explicit limit only; `None` when absent or unparsable.
    pub fn limit_opt(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
    }

    pub fn locale_or(&self, default: Locale) -> Locale {
        self.locale
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(default)
    }

    pub fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}
