use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(flatten)]
    pub details: Document,
}

impl Booking {
    pub fn new(email: String, mut details: Document) -> Self {
        details.remove("_id");
        details.remove("email");
        Self {
            id: ObjectId::new(),
            email,
            details,
        }
    }
}
