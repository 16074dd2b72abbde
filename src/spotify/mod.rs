//! # Spotify Integration Module
//!
//! This module is the relay's only outbound HTTP surface. [`SpotifyClient`] wraps a
//! shared `reqwest::Client` together with the endpoints and application
//! credentials taken from [`Config`], and exposes one method per Spotify Web API
//! call the relay performs.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers / playlist pipeline
//!          ↓
//! SpotifyClient
//!     ├── Authorization (authorize URL, code exchange)
//!     ├── User profile
//!     ├── Top items (tracks, artists)
//!     ├── Recommendations
//!     └── Playlist operations (create, add tracks)
//!          ↓
//! reqwest (JSON, rustls)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Authorization code exchange (Basic client auth)
//! - `GET /me` - Current user's profile
//! - `GET /me/top/{tracks,artists}` - User's top items
//! - `GET /recommendations` - Seeded recommendations
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to a playlist
//!
//! ## Error Handling
//!
//! Every call maps transport failures and non-success statuses to
//! [`Error::Upstream`]. There are no retries; the outbound timeout configured
//! through `UPSTREAM_TIMEOUT_SECS` is the only bound on a call's duration.
//! Token refresh is out of scope: an expired bearer token simply makes the
//! upstream call fail.

pub mod auth;
pub mod playlist;
pub mod recommendations;
pub mod top;
pub mod user;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{Error, Res, config::Config};

/// Client for the Spotify accounts service and Web API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_base: Url,
    auth_url: Url,
    token_url: Url,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Res<Self> {
        let http = Client::builder().timeout(config.upstream_timeout).build()?;

        Ok(SpotifyClient {
            http,
            api_base: parse_url(&config.api_url, "SPOTIFY_API_URL")?,
            auth_url: parse_url(&config.auth_url, "SPOTIFY_API_AUTH_URL")?,
            token_url: parse_url(&config.token_url, "SPOTIFY_API_TOKEN_URL")?,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
        })
    }

    /// Resolves `segments` below the Web API base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Res<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::invalid_config("SPOTIFY_API_URL", "cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, token: &str, segments: &[&str]) -> Res<RequestBuilder> {
        Ok(self.http.get(self.endpoint(segments)?).bearer_auth(token))
    }

    fn post(&self, token: &str, segments: &[&str]) -> Res<RequestBuilder> {
        Ok(self.http.post(self.endpoint(segments)?).bearer_auth(token))
    }
}

/// Sends the request and decodes a successful JSON body.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Res<T> {
    let response: Response = request.send().await?.error_for_status()?;
    Ok(response.json::<T>().await?)
}

fn parse_url(raw: &str, name: &'static str) -> Res<Url> {
    Url::parse(raw).map_err(|e| Error::invalid_config(name, e.to_string()))
}
