//! Auth handlers: register, login, refresh, logout, self.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use authgate_core::error::AppError;

use crate::cookies::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, clear_session_cookies, with_session_cookies,
};
use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{IdResponse, SelfResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let user = state.session_service.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id: user.id })))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<IdResponse>), ApiError> {
    let outcome = state
        .session_service
        .login(&req.email, &req.password)
        .await?;

    let jar = with_session_cookies(jar, &outcome.tokens, &state.config.cookie);
    Ok((jar, Json(IdResponse { id: outcome.user_id })))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<IdResponse>), ApiError> {
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(AppError::invalid_session)?;

    let outcome = state.session_service.refresh(&presented).await?;

    let jar = with_session_cookies(jar, &outcome.tokens, &state.config.cookie);
    Ok((jar, Json(IdResponse { id: outcome.user_id })))
}

/// POST /auth/logout
///
/// Always succeeds and clears both cookies.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(cookie) = jar.get(REFRESH_TOKEN_COOKIE) {
        if let Err(e) = state.session_service.logout_presented(cookie.value()).await {
            error!(kind = %e.kind, error = %e.message, "Failed to revoke refresh token on logout");
        }
    }

    (clear_session_cookies(jar, &state.config.cookie), StatusCode::OK)
}

/// GET /auth/self
pub async fn current_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SelfResponse>, ApiError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing access token"))?;

    let claims = state.session_service.authenticate(&token)?;
    let user = state.session_service.current_user(claims.user_id()).await?;
    Ok(Json(user.into()))
}
