use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use metrics::counter;
use service_core::error::AppError;

use crate::{models::IdentityClaim, services::TokenService, startup::AppState};

/// Cookie carrying the credential.
pub const TOKEN_COOKIE: &str = "token";

/// Gate for protected routes.
///
/// An absent token is rejected before any signature work is done.
pub fn authorize(token: Option<&str>, tokens: &TokenService) -> Result<IdentityClaim, AppError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("missing token")))?;

    tokens
        .verify(token)
        .map_err(|e| AppError::Unauthorized(anyhow::anyhow!("invalid token: {}", e)))
}

/// Runs [`authorize`] on the `token` cookie. On success the claim is attached to
/// the request for [`AuthUser`]; on failure the handler never runs.
pub async fn credential_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar.get(TOKEN_COOKIE).map(|c| c.value());

    let claim = match authorize(token, &state.tokens) {
        Ok(claim) => claim,
        Err(e) => {
            let reason = if token.is_some() { "invalid" } else { "missing" };
            counter!("credential_rejections_total", "reason" => reason).increment(1);
            tracing::warn!(path = %req.uri().path(), reason, "Rejected request at credential gate");
            return Err(e);
        }
    };

    req.extensions_mut().insert(claim);

    Ok(next.run(req).await)
}

/// Verified identity of the caller, available behind [`credential_gate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub IdentityClaim);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claim = parts.extensions.get::<IdentityClaim>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Identity claim missing from request extensions"
            ))
        })?;

        Ok(AuthUser(claim.clone()))
    }
}
