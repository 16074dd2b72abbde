use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{ApiError, append_cookie, found, top::top_songs_playlist};
use crate::{
    config::CallbackMode,
    server::AppState,
    spotify::top::TopParams,
    utils::{self, SESSION_COOKIE, STATE_COOKIE, TOKEN_COOKIE},
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Completes the authorization code flow.
///
/// Exchanges `code` for a bearer token, stores it in a new session and then
/// answers according to the configured [`CallbackMode`]. Nothing is stored
/// unless the exchange succeeds.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        let message = match params.error {
            Some(reason) => format!("Missing required parameters: code (provider error: {reason})"),
            None => "Missing required parameters: code".to_string(),
        };
        return Err(ApiError::bad_request(message));
    };

    if state.config.validate_state {
        let expected = utils::read_cookie(&headers, STATE_COOKIE);
        let matches = matches!(
            (params.state.as_deref(), expected.as_deref()),
            (Some(received), Some(expected)) if received == expected
        );
        if !matches {
            warn!("authorization state missing or mismatched, rejecting callback");
            return Err(ApiError::bad_request("state_mismatch"));
        }
    }

    let token = state
        .spotify
        .exchange_code(&code)
        .await
        .map_err(|e| ApiError::upstream("Error exchanging code for access token", e))?;

    let session = state.sessions.create(token.access_token.clone()).await;
    info!(mode = ?state.config.callback_mode, "authorization completed, session created");

    let cookies = &state.config.cookies;
    let session_cookie = utils::build_cookie(
        SESSION_COOKIE,
        &session.id,
        "/",
        Some(state.config.session_ttl.as_secs()),
        cookies,
    );

    let response = match state.config.callback_mode {
        CallbackMode::Redirect => {
            let mut response = found(&state.config.frontend_redirect_url);
            append_cookie(&mut response, session_cookie);
            response
        }
        CallbackMode::Token => {
            let max_age = (token.expires_in > 0).then_some(token.expires_in);
            let mut response = Json(json!({ "status": "authenticated" })).into_response();
            append_cookie(
                &mut response,
                utils::build_cookie(TOKEN_COOKIE, &token.access_token, "/", max_age, cookies),
            );
            response
        }
        CallbackMode::Playlist => {
            let built =
                top_songs_playlist(&state, &token.access_token, TopParams::default()).await;
            let mut response = match built {
                Ok(body) => Json(body).into_response(),
                Err(err) => err.into_response(),
            };
            append_cookie(&mut response, session_cookie);
            response
        }
    };

    Ok(response)
}
