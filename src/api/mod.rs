//! # API Module
//!
//! This module provides the browser-facing HTTP endpoints of the relay. Each
//! handler is a plain async function wired into the router in
//! [`crate::server::router`].
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Redirects the browser to Spotify's authorization page.
//! - [`callback`] - Exchanges the authorization code for a bearer token and
//!   opens a session.
//! - [`get_access_token`] - Returns the bearer token of the current session.
//!
//! ### Proxied reads
//!
//! - [`user`] - Display name and email of the current user.
//! - [`top_tracks`] / [`top_artists`] - The user's top items, relayed as-is.
//! - [`top_songs`] - Top tracks narrowed to id, name, URI and artist names;
//!   with `?playlist=true` the songs are also saved as a playlist.
//!
//! ### Playlist building
//!
//! - [`recommended`] - Runs the [`crate::pipeline`] seeded by top tracks and
//!   artists.
//!
//! ### Monitoring
//!
//! - [`health`] - Status, version and current session count.
//!
//! ## Authentication
//!
//! Handlers that talk to Spotify take a [`BearerToken`] argument. The
//! extractor resolves the `sessionId` cookie (or a raw `access_token` cookie)
//! and rejects the request with 401 before any upstream call is made.
//!
//! ## Errors
//!
//! Handlers return [`ApiError`], rendered as `{ "error": "..." }`. Upstream
//! failures of any kind collapse into a 500 with a generic message; the cause
//! is logged server-side.

mod callback;
mod error;
mod health;
mod login;
mod recommended;
mod session;
mod token;
mod top;
mod user;

use axum::{
    http::{
        HeaderValue, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use tracing::warn;

pub use callback::{CallbackQuery, callback};
pub use error::ApiError;
pub use health::health;
pub use login::login;
pub use recommended::recommended;
pub use session::{BearerToken, resolve_token};
pub use token::get_access_token;
pub use top::{TopQuery, top_artists, top_songs, top_tracks};
pub use user::user;

/// `302 Found` pointing at `location`.
fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(_) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Invalid redirect location",
        )
        .into_response(),
    }
}

fn append_cookie(response: &mut Response, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(_) => warn!("dropping cookie with invalid characters"),
    }
}
