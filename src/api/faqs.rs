use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::{error_response, AppState, ListQuery};
use crate::resources::faqs;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/faqs", get(list_faqs))
        .route("/api/faqs/search", get(search_faqs))
}

async fn list_faqs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let locale = query.locale_or(state.default_locale);
    let category = ListQuery::non_blank(&query.category);
    let faqs = faqs::list(&state.ctx, locale, category)
        .await
        .unwrap_or_else(|err| {
            warn!(err = %err, "faq list failed; returning empty list");
            Vec::new()
        });
    Json(json!({ "faqs": faqs }))
}

async fn search_faqs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, Response> {
    let Some(needle) = ListQuery::non_blank(&query.q) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "query parameter 'q' is required",
        ));
    };
    let locale = query.locale_or(state.default_locale);
    let faqs = faqs::search(&state.ctx, needle, locale)
        .await
        .unwrap_or_else(|err| {
            warn!(err = %err, "faq search failed; returning empty list");
            Vec::new()
        });
    Ok(Json(json!({ "faqs": faqs, "query": needle })))
}
