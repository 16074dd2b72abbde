use axum::{Json, extract::State, http::HeaderMap};
use serde_json::{Value, json};

use super::{ApiError, session::session_token};
use crate::server::AppState;

/// Returns the bearer token held for the caller's `sessionId` cookie.
///
/// Answers 404 rather than 401 when no live session matches.
pub async fn get_access_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    session_token(&state, &headers)
        .await
        .map(|token| Json(json!({ "access_token": token })))
        .ok_or_else(|| ApiError::not_found("Access token not found"))
}
