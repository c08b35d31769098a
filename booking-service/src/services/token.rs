use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::config::AuthConfig;
use crate::models::IdentityClaim;

/// Signs identity claims into HS256 credentials and verifies them.
///
/// The secret is read once at startup and never changes for the life of the
/// process; the server keeps no session state.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

/// Token payload: the client's claim verbatim plus issue and expiry times.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialClaims {
    #[serde(flatten)]
    identity: IdentityClaim,
    iat: i64,
    exp: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(
            config.token_secret.expose_secret().as_bytes(),
            config.token_ttl_seconds,
        )
    }

    pub fn from_secret(secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn issue(&self, identity: &IdentityClaim) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = CredentialClaims {
            identity: identity.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to sign credential: {}", e))
        })
    }

    /// Checks signature and expiry, with no clock leeway. Any `aud` in the
    /// claim is client data and is not checked.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = decode::<CredentialClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims.identity)
    }
}
