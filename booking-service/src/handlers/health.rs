use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::services::get_metrics;
use crate::startup::AppState;

pub async fn root() -> &'static str {
    "Clean Co Server is running"
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.catalog.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB health check failed");
        e
    })?;

    Ok(Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": state.config.service_version,
    })))
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
