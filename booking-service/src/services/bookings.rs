use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use service_core::error::AppError;
use std::sync::Arc;

use crate::models::{Booking, IdentityClaim};
use crate::services::MongoDb;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: Booking) -> Result<ObjectId, AppError>;

    /// Bookings whose `email` equals the given value, or all of them for `None`.
    async fn find_bookings(&self, email: Option<&str>) -> Result<Vec<Booking>, AppError>;

    /// Returns the number of deleted records (0 or 1).
    async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError>;
}

pub struct MongoBookingStore {
    db: MongoDb,
}

impl MongoBookingStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for MongoBookingStore {
    async fn insert_booking(&self, booking: Booking) -> Result<ObjectId, AppError> {
        let id = booking.id;
        self.db
            .bookings()
            .insert_one(booking, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert booking: {}", e);
                AppError::from(e)
            })?;
        Ok(id)
    }

    async fn find_bookings(&self, email: Option<&str>) -> Result<Vec<Booking>, AppError> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => doc! {},
        };

        let cursor = self.db.bookings().find(filter, None).await.map_err(|e| {
            tracing::error!("Failed to query bookings: {}", e);
            AppError::from(e)
        })?;

        cursor.try_collect().await.map_err(AppError::from)
    }

    async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .db
            .bookings()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(booking_id = %id, "Failed to delete booking: {}", e);
                AppError::from(e)
            })?;
        Ok(result.deleted_count)
    }
}

/// Ownership check for booking listing.
///
/// The requested email must equal the email inside the verified credential.
/// Both sides are optional: when neither carries an email the check passes and
/// the returned filter is `None`, which lists every booking.
pub fn authorize_booking_listing<'a>(
    query_email: Option<&'a str>,
    claim: &IdentityClaim,
) -> Result<Option<&'a str>, AppError> {
    if query_email != claim.email.as_deref() {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "requested bookings of another identity"
        )));
    }
    Ok(query_email)
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, email: String, details: Document) -> Result<ObjectId, AppError> {
        let booking = Booking::new(email, details);
        let id = self.store.insert_booking(booking).await?;
        tracing::info!(booking_id = %id, "Booking created");
        Ok(id)
    }

    pub async fn list_for(
        &self,
        query_email: Option<&str>,
        claim: &IdentityClaim,
    ) -> Result<Vec<Booking>, AppError> {
        let email = authorize_booking_listing(query_email, claim)?;
        self.store.find_bookings(email).await
    }

    pub async fn cancel(&self, raw_id: &str) -> Result<u64, AppError> {
        let id = ObjectId::parse_str(raw_id)
            .map_err(|_| AppError::NotFound(anyhow::anyhow!("booking not found")))?;
        let deleted = self.store.delete_booking(id).await?;
        tracing::info!(booking_id = %id, deleted, "Booking cancelled");
        Ok(deleted)
    }
}
