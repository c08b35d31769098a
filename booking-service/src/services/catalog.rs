use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::FindOptions;
use service_core::error::AppError;
use std::sync::Arc;

use crate::models::ServiceRecord;
use crate::query::QueryDescriptor;
use crate::services::MongoDb;

/// Read access to the services catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Records matching the descriptor: filter, then sort, then skip/limit.
    async fn find_services(&self, query: &QueryDescriptor) -> Result<Vec<ServiceRecord>, AppError>;

    /// Size of the whole collection, ignoring any filter.
    async fn count_services(&self) -> Result<u64, AppError>;

    async fn find_service(&self, id: ObjectId) -> Result<Option<ServiceRecord>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

pub struct MongoCatalogStore {
    db: MongoDb,
}

impl MongoCatalogStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

fn filter_document(query: &QueryDescriptor) -> Document {
    query
        .filter
        .iter()
        .map(|(field, value)| (field.clone(), Bson::String(value.clone())))
        .collect()
}

fn sort_document(query: &QueryDescriptor) -> Option<Document> {
    if query.sort.is_empty() {
        return None;
    }
    Some(
        query
            .sort
            .iter()
            .map(|(field, order)| (field.clone(), Bson::Int32(order.direction())))
            .collect(),
    )
}

fn find_options(query: &QueryDescriptor) -> FindOptions {
    FindOptions::builder()
        .sort(sort_document(query))
        .skip(Some(query.skip()).filter(|s| *s > 0))
        .limit(query.limit().map(|l| i64::try_from(l).unwrap_or(i64::MAX)))
        .build()
}

#[async_trait]
impl CatalogStore for MongoCatalogStore {
    async fn find_services(&self, query: &QueryDescriptor) -> Result<Vec<ServiceRecord>, AppError> {
        let cursor = self
            .db
            .services()
            .find(filter_document(query), find_options(query))
            .await
            .map_err(|e| {
                tracing::error!("Failed to query services: {}", e);
                AppError::from(e)
            })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect services: {}", e);
            AppError::from(e)
        })
    }

    async fn count_services(&self) -> Result<u64, AppError> {
        self.db
            .services()
            .count_documents(doc! {}, None)
            .await
            .map_err(AppError::from)
    }

    async fn find_service(&self, id: ObjectId) -> Result<Option<ServiceRecord>, AppError> {
        self.db
            .services()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

/// One page of the catalog together with the collection-wide total.
#[derive(Debug)]
pub struct CatalogPage {
    pub total: u64,
    pub records: Vec<ServiceRecord>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// `total` counts every record in the catalog, not just the filtered ones.
    pub async fn list(&self, query: &QueryDescriptor) -> Result<CatalogPage, AppError> {
        let records = self.store.find_services(query).await?;
        let total = self.store.count_services().await?;

        tracing::debug!(
            returned = records.len(),
            total,
            skip = query.skip(),
            "Listed services"
        );

        Ok(CatalogPage { total, records })
    }

    pub async fn get(&self, raw_id: &str) -> Result<ServiceRecord, AppError> {
        let not_found = || AppError::NotFound(anyhow::anyhow!("service not found"));

        let id = ObjectId::parse_str(raw_id).map_err(|_| not_found())?;
        self.store.find_service(id).await?.ok_or_else(not_found)
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}
