use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, BearerToken};
use crate::{
    pipeline::{PlaylistPipeline, TrackSource},
    server::AppState,
    spotify::top::{TopKind, TopParams},
    types::{Song, TimeRange},
};

#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub limit: Option<u32>,
    pub time_range: Option<TimeRange>,
    /// `/top-songs` only: also build a playlist from the songs.
    #[serde(default)]
    pub playlist: bool,
}

impl TopQuery {
    fn params(&self) -> TopParams {
        TopParams::new(self.limit, self.time_range)
    }
}

pub async fn top_tracks(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<TopQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .spotify
        .top_items::<Value>(&token, TopKind::Tracks, query.params())
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Error fetching top tracks", e))
}

pub async fn top_artists(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<TopQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .spotify
        .top_items::<Value>(&token, TopKind::Artists, query.params())
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Error fetching top artists", e))
}

/// The user's top tracks narrowed to [`Song`]s, optionally saved as a playlist.
pub async fn top_songs(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<TopQuery>,
) -> Result<Json<Value>, ApiError> {
    if query.playlist {
        return top_songs_playlist(&state, &token, query.params())
            .await
            .map(Json);
    }

    let page = state
        .spotify
        .top_tracks(&token, query.params())
        .await
        .map_err(|e| ApiError::upstream("Error fetching top songs", e))?;

    let songs: Vec<Song> = page.items.iter().map(Song::from).collect();
    Ok(Json(json!({ "songs": songs })))
}

/// Saves the user's top tracks into a new private playlist.
pub(crate) async fn top_songs_playlist(
    state: &AppState,
    token: &str,
    params: TopParams,
) -> Result<Value, ApiError> {
    let outcome = PlaylistPipeline::new(&state.spotify, token, TrackSource::TopTracks)
        .with_params(params)
        .run()
        .await
        .map_err(|e| ApiError::upstream("Error creating top songs playlist", e))?;

    let songs: Vec<Song> = outcome.tracks.iter().map(Song::from).collect();
    Ok(json!({
        "songs": songs,
        "playlist": outcome.playlist,
    }))
}
