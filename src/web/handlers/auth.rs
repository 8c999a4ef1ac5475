//! Session handlers.
//!
//! Sign-in happens at the external identity provider; these endpoints only
//! report and clear the session this service sees.

use axum::{http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::web::dto::MeResponse;
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, SharedIdentityProvider};

/// GET /api/auth/me - Current session.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Signed-in identity", body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(AuthUser(identity): AuthUser) -> Result<Json<MeResponse>, ApiError> {
    Ok(Json(MeResponse::from(identity)))
}

/// POST /api/auth/logout - Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session cookie cleared")
    )
)]
pub async fn logout(
    Extension(provider): Extension<SharedIdentityProvider>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    let jar = match provider.session_cookie() {
        Some(name) => jar.remove(Cookie::build((name.to_string(), "")).path("/")),
        None => jar,
    };

    (jar, StatusCode::NO_CONTENT)
}
