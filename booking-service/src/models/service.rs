use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// A catalog entry. Only `_id` is typed; `category`, `price` and everything
/// else are returned exactly as stored, so one irregular document cannot break
/// a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub attributes: Document,
}
