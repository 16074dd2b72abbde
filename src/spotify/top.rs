use serde::de::DeserializeOwned;

use super::{SpotifyClient, send_json};
use crate::{
    Res,
    types::{Artist, Page, TimeRange, Track},
};

/// Largest page the top-items endpoints accept.
pub const MAX_LIMIT: u8 = 50;
pub const DEFAULT_LIMIT: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopKind {
    Tracks,
    Artists,
}

impl TopKind {
    fn segment(&self) -> &'static str {
        match self {
            TopKind::Tracks => "tracks",
            TopKind::Artists => "artists",
        }
    }
}

/// Paging and time window for a top-items request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopParams {
    pub limit: u8,
    pub time_range: TimeRange,
}

impl TopParams {
    /// Clamps `limit` into the range Spotify accepts.
    pub fn new(limit: Option<u32>, time_range: Option<TimeRange>) -> Self {
        let limit = limit
            .unwrap_or(u32::from(DEFAULT_LIMIT))
            .clamp(1, u32::from(MAX_LIMIT));
        TopParams {
            limit: u8::try_from(limit).unwrap_or(MAX_LIMIT),
            time_range: time_range.unwrap_or_default(),
        }
    }
}

impl Default for TopParams {
    fn default() -> Self {
        TopParams::new(None, None)
    }
}

impl SpotifyClient {
    /// Fetches the user's top items (`GET /me/top/{type}`) decoded as `T`.
    ///
    /// Use `serde_json::Value` for `T` to relay the upstream body verbatim.
    pub async fn top_items<T: DeserializeOwned>(
        &self,
        token: &str,
        kind: TopKind,
        params: TopParams,
    ) -> Res<T> {
        let request = self.get(token, &["me", "top", kind.segment()])?.query(&[
            ("limit", params.limit.to_string()),
            ("time_range", params.time_range.as_str().to_string()),
        ]);
        send_json(request).await
    }

    pub async fn top_tracks(&self, token: &str, params: TopParams) -> Res<Page<Track>> {
        self.top_items(token, TopKind::Tracks, params).await
    }

    pub async fn top_artists(&self, token: &str, params: TopParams) -> Res<Page<Artist>> {
        self.top_items(token, TopKind::Artists, params).await
    }
}
