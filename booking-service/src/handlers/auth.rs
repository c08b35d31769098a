use axum::{extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use metrics::counter;
use service_core::error::AppError;

use crate::dtos::SuccessResponse;
use crate::middleware::TOKEN_COOKIE;
use crate::models::IdentityClaim;
use crate::startup::AppState;

/// `POST /api/v1/auth/access-token`
///
/// Signs the posted JSON object as-is and hands it back as the `token` cookie.
/// The cookie must travel cross-site, hence `SameSite=None` together with `Secure`.
pub async fn issue_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(identity), _): WithRejection<Json<IdentityClaim>, AppError>,
) -> Result<(CookieJar, Json<SuccessResponse>), AppError> {
    let reserved = identity.reserved_fields();
    if !reserved.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Payload may not set registered claims: {}",
            reserved.join(", ")
        )));
    }

    let token = state.tokens.issue(&identity)?;
    counter!("credentials_issued_total").increment(1);
    tracing::info!(ttl_seconds = state.tokens.ttl_seconds(), "Issued access token");

    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build();

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}
