use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::warn;

use super::{detail_error, AppState, ListQuery};
use crate::model::{BlogList, BlogPost};
use crate::resources::blog::{self, BlogParams};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blog", get(list_posts))
        .route("/api/blog/{slug}", get(get_post))
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<BlogList> {
    let params = BlogParams {
        page: query.page(),
        limit: query.limit(),
        category: ListQuery::non_blank(&query.category).map(str::to_string),
        locale: query.locale_or(state.default_locale),
    };
    match blog::list(&state.ctx, &params).await {
        Ok(list) => Json(list),
        Err(err) => {
            warn!(err = %err, "blog list failed; returning empty list");
            Json(BlogList::empty(params.page))
        }
    }
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, Response> {
    blog::detail(&state.ctx, &slug)
        .await
        .map(Json)
        .map_err(detail_error)
}
