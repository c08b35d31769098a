use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use service_core::error::AppError;

use crate::dtos::{CatalogListResponse, CatalogParams, ServiceResponse};
use crate::query::QueryDescriptor;
use crate::startup::AppState;

/// `GET /api/v1/services` (gated)
pub async fn list_services(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<CatalogParams>, AppError>,
) -> Result<Json<CatalogListResponse>, AppError> {
    let query = QueryDescriptor::from_params(&params)?;
    let page = state.catalog.list(&query).await?;

    Ok(Json(CatalogListResponse {
        total: page.total,
        result: page.records.into_iter().map(ServiceResponse::from).collect(),
    }))
}

/// `GET /api/v1/services/:serviceId`
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<ServiceResponse>, AppError> {
    let record = state.catalog.get(&service_id).await?;
    Ok(Json(ServiceResponse::from(record)))
}
