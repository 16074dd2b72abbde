//! The recommendation/playlist pipeline.
//!
//! Building a playlist takes several dependent upstream calls. The pipeline
//! walks them as explicit stages:
//!
//! ```text
//! Started → Seeded → Recommended → PlaylistCreated → Populated
//! ```
//!
//! Each step either advances to the next stage or ends the run with a
//! [`PipelineError`] naming the stage it failed to reach. Nothing is undone on
//! failure. A playlist created before a failing step stays behind on Spotify
//! and is reported through [`PipelineError::orphaned_playlist`].

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    Error,
    spotify::{SpotifyClient, recommendations::Tuning, top::TopParams},
    types::{Artist, PlaylistRef, Track},
};

pub const MAX_SEED_TRACKS: usize = 3;
pub const MAX_SEED_ARTISTS: usize = 2;

pub const RECOMMENDED_PLAYLIST_NAME: &str = "Recommended Mix";
pub const TOP_SONGS_PLAYLIST_NAME: &str = "My Top Songs";

/// Where the playlist's tracks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    /// Seed the recommendation endpoint with the user's top tracks and artists.
    Recommendations,
    /// Use the user's own top tracks as they are.
    TopTracks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Started,
    Seeded,
    Recommended,
    PlaylistCreated,
    Populated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Started => "started",
            Stage::Seeded => "seeded",
            Stage::Recommended => "recommended",
            Stage::PlaylistCreated => "playlist-created",
            Stage::Populated => "populated",
        };
        f.write_str(name)
    }
}

/// Track and artist ids used to bias the recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeds {
    pub tracks: Vec<String>,
    pub artists: Vec<String>,
}

impl Seeds {
    /// Takes the first three track ids and the first two artist ids.
    pub fn derive(tracks: &[Track], artists: &[Artist]) -> Self {
        Seeds {
            tracks: tracks
                .iter()
                .take(MAX_SEED_TRACKS)
                .map(|t| t.id.clone())
                .collect(),
            artists: artists
                .iter()
                .take(MAX_SEED_ARTISTS)
                .map(|a| a.id.clone())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.artists.is_empty()
    }
}

#[derive(Debug, Error)]
#[error("playlist pipeline failed before reaching {failed_at}: {source}")]
pub struct PipelineError {
    pub failed_at: Stage,
    /// Playlist left on Spotify by an earlier, successful step.
    pub orphaned_playlist: Option<PlaylistRef>,
    #[source]
    pub source: Error,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub playlist: PlaylistRef,
    pub tracks: Vec<Track>,
    /// Seeds sent upstream; `None` for [`TrackSource::TopTracks`].
    pub seeds: Option<Seeds>,
    pub snapshot_id: String,
}

pub struct PlaylistPipeline<'a> {
    client: &'a SpotifyClient,
    token: &'a str,
    source: TrackSource,
    params: TopParams,
    tuning: Tuning,
    stage: Stage,
}

impl<'a> PlaylistPipeline<'a> {
    pub fn new(client: &'a SpotifyClient, token: &'a str, source: TrackSource) -> Self {
        PlaylistPipeline {
            client,
            token,
            source,
            params: TopParams::default(),
            tuning: Tuning::default(),
            stage: Stage::Started,
        }
    }

    pub fn with_params(mut self, params: TopParams) -> Self {
        self.params = params;
        self
    }

    fn playlist_name(&self) -> &'static str {
        match self.source {
            TrackSource::Recommendations => RECOMMENDED_PLAYLIST_NAME,
            TrackSource::TopTracks => TOP_SONGS_PLAYLIST_NAME,
        }
    }

    fn fail(&self, failed_at: Stage, orphan: Option<PlaylistRef>, source: Error) -> PipelineError {
        PipelineError {
            failed_at,
            orphaned_playlist: orphan,
            source,
        }
    }

    fn advance(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "playlist pipeline advanced");
        self.stage = stage;
    }

    /// Runs every stage to completion or to the first failure.
    pub async fn run(mut self) -> Result<PipelineOutcome, PipelineError> {
        let (candidates, seeds) = self.seed().await?;
        self.advance(Stage::Seeded);

        let tracks = self.recommend(candidates, seeds.as_ref()).await?;
        self.advance(Stage::Recommended);

        let playlist = self.create_playlist().await?;
        self.advance(Stage::PlaylistCreated);

        let snapshot_id = self.populate(&playlist, &tracks).await?;
        self.advance(Stage::Populated);

        info!(
            playlist_id = %playlist.id,
            tracks = tracks.len(),
            "playlist created and populated"
        );

        Ok(PipelineOutcome {
            playlist,
            tracks,
            seeds,
            snapshot_id,
        })
    }

    /// Fetches the user's top items; for recommendations both lists are
    /// fetched concurrently and reduced to seeds.
    async fn seed(&self) -> Result<(Vec<Track>, Option<Seeds>), PipelineError> {
        match self.source {
            TrackSource::TopTracks => {
                let page = self
                    .client
                    .top_tracks(self.token, self.params)
                    .await
                    .map_err(|e| self.fail(Stage::Seeded, None, e))?;
                Ok((page.items, None))
            }
            TrackSource::Recommendations => {
                let (tracks, artists) = tokio::try_join!(
                    self.client.top_tracks(self.token, self.params),
                    self.client.top_artists(self.token, self.params),
                )
                .map_err(|e| self.fail(Stage::Seeded, None, e))?;

                let seeds = Seeds::derive(&tracks.items, &artists.items);
                if seeds.is_empty() {
                    return Err(self.fail(
                        Stage::Seeded,
                        None,
                        Error::Payload("user has no top tracks or artists to seed from".into()),
                    ));
                }
                Ok((tracks.items, Some(seeds)))
            }
        }
    }

    async fn recommend(
        &self,
        candidates: Vec<Track>,
        seeds: Option<&Seeds>,
    ) -> Result<Vec<Track>, PipelineError> {
        let tracks = match seeds {
            Some(seeds) => self
                .client
                .recommendations(self.token, &seeds.tracks, &seeds.artists, self.tuning)
                .await
                .map_err(|e| self.fail(Stage::Recommended, None, e))?,
            None => candidates,
        };

        if tracks.is_empty() {
            return Err(self.fail(
                Stage::Recommended,
                None,
                Error::Payload("no tracks to add to the playlist".into()),
            ));
        }
        Ok(tracks)
    }

    async fn create_playlist(&self) -> Result<PlaylistRef, PipelineError> {
        let user = self
            .client
            .current_user(self.token)
            .await
            .map_err(|e| self.fail(Stage::PlaylistCreated, None, e))?;

        let description = match self.source {
            TrackSource::Recommendations => "Recommendations seeded by your top tracks and artists",
            TrackSource::TopTracks => "Your current top tracks",
        };

        let created = self
            .client
            .create_playlist(self.token, &user.id, self.playlist_name(), description)
            .await
            .map_err(|e| self.fail(Stage::PlaylistCreated, None, e))?;

        Ok(PlaylistRef {
            id: created.id,
            name: created.name,
        })
    }

    async fn populate(
        &self,
        playlist: &PlaylistRef,
        tracks: &[Track],
    ) -> Result<String, PipelineError> {
        let uris = tracks.iter().map(|t| t.uri.clone()).collect();
        match self.client.add_tracks(self.token, &playlist.id, uris).await {
            Ok(response) => Ok(response.snapshot_id),
            Err(e) => {
                warn!(
                    playlist_id = %playlist.id,
                    "adding tracks failed, playlist left without tracks"
                );
                Err(self.fail(Stage::Populated, Some(playlist.clone()), e))
            }
        }
    }
}
