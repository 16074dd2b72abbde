use axum::{extract::State, response::Response};
use tracing::debug;

use super::{append_cookie, found};
use crate::{
    server::AppState,
    utils::{self, STATE_COOKIE, STATE_COOKIE_MAX_AGE},
};

/// Sends the browser to Spotify's authorization page.
///
/// A fresh `state` value goes into the authorization URL and, while state
/// validation is enabled, into a short-lived `oauth_state` cookie scoped to
/// `/callback` so the callback can compare the two.
pub async fn login(State(state): State<AppState>) -> Response {
    let csrf_state = utils::generate_state();
    let authorize_url = state.spotify.authorize_url(&csrf_state);

    let mut response = found(authorize_url.as_str());
    if state.config.validate_state {
        append_cookie(
            &mut response,
            utils::build_cookie(
                STATE_COOKIE,
                &csrf_state,
                "/callback",
                Some(STATE_COOKIE_MAX_AGE),
                &state.config.cookies,
            ),
        );
    }

    debug!("redirecting browser to the authorization endpoint");
    response
}
