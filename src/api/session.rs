use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use super::ApiError;
use crate::{
    server::AppState,
    utils::{self, SESSION_COOKIE, TOKEN_COOKIE},
};

/// Bearer token of the calling browser session.
///
/// Rejects with 401 before the handler runs, so unauthenticated requests
/// never reach the Spotify API.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_token(state, &parts.headers)
            .await
            .map(BearerToken)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Finds the request's bearer token.
///
/// The `sessionId` cookie is resolved through the session store first. A raw
/// `access_token` cookie, as set in token callback mode, is the fallback.
pub async fn resolve_token(state: &AppState, headers: &HeaderMap) -> Option<String> {
    if let Some(session_id) = utils::read_cookie(headers, SESSION_COOKIE) {
        if let Some(token) = state.sessions.access_token(&session_id).await {
            return Some(token);
        }
    }
    utils::read_cookie(headers, TOKEN_COOKIE)
}

/// Bearer token stored for the request's `sessionId` cookie, if any.
pub async fn session_token(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let session_id = utils::read_cookie(headers, SESSION_COOKIE)?;
    state.sessions.access_token(&session_id).await
}
