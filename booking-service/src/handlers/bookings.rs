use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use metrics::counter;
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{
    BookingListParams, BookingResponse, CreateBookingRequest, DeleteResponse, InsertResponse,
};
use crate::middleware::AuthUser;
use crate::startup::AppState;

/// `POST /api/v1/user/create-booking`
pub async fn create_booking(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateBookingRequest>, AppError>,
) -> Result<Json<InsertResponse>, AppError> {
    request.validate()?;

    let details = mongodb::bson::to_document(&request.details)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid booking body: {}", e)))?;

    let id = state.bookings.create(request.email, details).await?;
    counter!("bookings_created_total").increment(1);

    Ok(Json(InsertResponse {
        acknowledged: true,
        inserted_id: id.to_hex(),
    }))
}

/// `GET /api/v1/user/bookings` (gated, owner only)
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<BookingListParams>, AppError>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state
        .bookings
        .list_for(params.email.as_deref(), &claim)
        .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// `DELETE /api/v1/user/cancel-booking/:bookingId`
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted_count = state.bookings.cancel(&booking_id).await?;

    Ok(Json(DeleteResponse {
        acknowledged: true,
        deleted_count,
    }))
}
