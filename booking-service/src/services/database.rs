use crate::models::{Booking, ServiceRecord};
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

/// Process-wide MongoDB handle. The driver pools connections internally, so
/// clones are cheap and share the pool.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for booking-service");

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_lookup".to_string())
                    .build(),
            )
            .build();

        self.services()
            .create_index(category_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category index on services: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on services.category");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("booking_email_lookup".to_string())
                    .build(),
            )
            .build();

        self.bookings()
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create email index on bookings: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on bookings.email");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn services(&self) -> Collection<ServiceRecord> {
        self.db.collection("services")
    }

    pub fn bookings(&self) -> Collection<Booking> {
        self.db.collection("bookings")
    }
}
