use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::{error_response, AppState};
use crate::error::GatewayError;
use crate::model::FormSubmission;
use crate::resources::forms;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/form-submissions", post(submit_form))
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FormSubmission>, JsonRejection>,
) -> Response {
    let Json(form) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match forms::submit(&state.ctx, form).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "id": id })),
        )
            .into_response(),
        Err(GatewayError::Invalid(message)) => error_response(StatusCode::BAD_REQUEST, message),
        Err(err) => {
            warn!(err = %err, "form submission failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                "failed to store the submission in the CMS",
            )
        }
    }
}
