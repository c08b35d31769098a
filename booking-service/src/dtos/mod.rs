use crate::models::{Booking, ServiceRecord};
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Raw query string of the catalog listing. Everything arrives as text and is
/// interpreted by [`crate::query::QueryDescriptor::from_params`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    pub category: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(email)]
    pub email: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl From<ServiceRecord> for ServiceResponse {
    fn from(record: ServiceRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            attributes: document_to_json(record.attributes),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_hex(),
            email: booking.email,
            details: document_to_json(booking.details),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogListResponse {
    pub total: u64,
    pub result: Vec<ServiceResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Relaxed extended JSON, so numbers and strings come out as plain JSON.
fn document_to_json(document: Document) -> Map<String, Value> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
