//! Home page and directory endpoints: hero banners, partner logos,
//! universities and student stories.
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::{AppState, ListQuery};
use crate::resources::{hero, partners, stories, universities};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/home/hero", get(hero_banners))
        .route("/api/partner-logos", get(partner_logos))
        .route("/api/universities", get(list_universities))
        .route("/api/student-stories", get(list_stories))
}

fn or_empty<T>(result: crate::error::Result<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(err = %err, what, "list failed; returning empty list");
        Vec::new()
    })
}

async fn hero_banners(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let locale = query.locale_or(state.default_locale);
    let banners = or_empty(hero::banners(&state.ctx, locale).await, "hero banners");
    Json(json!({ "banners": banners }))
}

async fn partner_logos(State(state): State<Arc<AppState>>) -> Json<Value> {
    let logos = or_empty(partners::list(&state.ctx).await, "partner logos");
    Json(json!({ "logos": logos }))
}

async fn list_universities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let locale = query.locale_or(state.default_locale);
    let country = ListQuery::non_blank(&query.country);
    let universities = or_empty(
        universities::list(&state.ctx, country, locale).await,
        "universities",
    );
    Json(json!({ "universities": universities }))
}

async fn list_stories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    let locale = query.locale_or(state.default_locale);
    let stories = or_empty(
        stories::list(&state.ctx, query.limit_opt(), locale).await,
        "student stories",
    );
    Json(json!({ "stories": stories }))
}
