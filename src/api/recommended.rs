use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::{ApiError, BearerToken};
use crate::{
    pipeline::{PlaylistPipeline, TrackSource},
    server::AppState,
};

/// Builds a private playlist from recommendations seeded by the user's top
/// tracks and artists.
///
/// Every call creates a new playlist. If adding the tracks fails the empty
/// playlist stays on Spotify and the request still answers 500.
pub async fn recommended(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, ApiError> {
    let outcome = PlaylistPipeline::new(&state.spotify, &token, TrackSource::Recommendations)
        .run()
        .await
        .map_err(|e| ApiError::upstream("Error creating recommended playlist", e))?;

    Ok(Json(json!({
        "message": "Playlist created successfully",
        "playlist": outcome.playlist,
        "tracks": outcome.tracks.len(),
    })))
}
