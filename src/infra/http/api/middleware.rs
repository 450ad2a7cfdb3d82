use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use super::state::ApiState;

pub const SESSION_COOKIE: &str = "quill_session";

/// Attaches the caller's `Identity` when a valid session token is presented.
/// Anonymous requests pass through untouched; the admin extractor decides.
pub async fn resolve_session(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = session_token(request.headers())
        .and_then(|token| state.auth.resolve_session(&token));

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// Bearer header first, then the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}
