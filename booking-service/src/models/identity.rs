use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWT registered claims managed by the token service itself.
pub const RESERVED_CLAIMS: [&str; 3] = ["exp", "iat", "nbf"];

/// Client-supplied identity embedded verbatim in a credential.
///
/// Only `email` is interpreted by the server; every other field is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdentityClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl IdentityClaim {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            attributes: Map::new(),
        }
    }

    /// Names of client fields that would collide with registered token claims.
    pub fn reserved_fields(&self) -> Vec<&str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .filter(|k| RESERVED_CLAIMS.contains(k))
            .collect()
    }
}
