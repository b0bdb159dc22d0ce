use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::warn;

use super::{detail_error, AppState, ListQuery};
use crate::model::{Program, ProgramList};
use crate::resources::programs::{self, ProgramParams};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/programs", get(list_programs))
        .route("/api/programs/{id}", get(get_program))
}

async fn list_programs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<ProgramList> {
    let params = ProgramParams {
        page: query.page(),
        limit: query.limit(),
        grade: ListQuery::non_blank(&query.grade).map(str::to_string),
        program_type: ListQuery::non_blank(&query.program_type).map(str::to_string),
        locale: query.locale_or(state.default_locale),
    };
    match programs::list(&state.ctx, &params).await {
        Ok(list) => Json(list),
        Err(err) => {
            warn!(err = %err, "program list failed; returning empty list");
            Json(ProgramList::empty(params.page))
        }
    }
}

async fn get_program(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Program>, Response> {
    programs::detail(&state.ctx, &id)
        .await
        .map(Json)
        .map_err(detail_error)
}
