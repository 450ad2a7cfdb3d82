//! Sign-up, sign-in and session handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::domain::inputs::{SignIn, SignUp};

use super::auth_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::{ApiJson, MaybeIdentity};
use crate::infra::http::api::middleware::SESSION_COOKIE;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::{ApiState, CookieSettings};

pub async fn sign_up(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = SignUp {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        confirm_password: payload.confirm_password,
    };
    let user = state.auth.sign_up(input).await.map_err(auth_to_api)?;
    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "User created successfully".to_string(),
            user: user_response(user),
        }),
    ))
}

pub async fn sign_in(
    State(state): State<ApiState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = SignIn {
        email: payload.email,
        password: payload.password,
    };
    let signed_in = state.auth.sign_in(input).await.map_err(auth_to_api)?;

    let cookie = session_cookie(signed_in.session.token.clone(), state.cookies);
    Ok((
        jar.add(cookie),
        Json(SignInResponse {
            token: signed_in.session.token,
            expires_at: signed_in.session.expires_at,
            user: user_response(signed_in.user),
        }),
    ))
}

/// A valid token for an account that no longer exists is treated as signed out.
pub async fn current_session(
    State(state): State<ApiState>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let identity = identity.ok_or_else(|| ApiError::unauthorized("Not signed in"))?;
    let user = state
        .auth
        .current_user(identity)
        .await
        .map_err(auth_to_api)?
        .ok_or_else(|| ApiError::unauthorized("Not signed in"))?;
    Ok(Json(SessionResponse {
        id: user.id,
        role: user.role.as_str().to_string(),
    }))
}

/// Tokens are stateless; signing out only drops the cookie.
pub async fn sign_out(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}

fn session_cookie(token: String, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(settings.max_age)
        .build()
}
