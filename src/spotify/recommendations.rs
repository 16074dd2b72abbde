use super::{SpotifyClient, send_json};
use crate::{
    Res,
    types::{RecommendationsResponse, Track},
};

/// Fixed tuning attributes sent with every recommendation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub min_popularity: u8,
    pub target_energy: f32,
    pub limit: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            min_popularity: 50,
            target_energy: 0.7,
            limit: 20,
        }
    }
}

impl SpotifyClient {
    /// Requests tracks seeded by the given track and artist ids
    /// (`GET /recommendations`).
    ///
    /// Seeds are sent as comma-separated lists; an empty list is left out of
    /// the query entirely. Spotify allows at most five seeds in total, so
    /// callers truncate them first.
    pub async fn recommendations(
        &self,
        token: &str,
        seed_tracks: &[String],
        seed_artists: &[String],
        tuning: Tuning,
    ) -> Res<Vec<Track>> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(5);
        if !seed_tracks.is_empty() {
            query.push(("seed_tracks", seed_tracks.join(",")));
        }
        if !seed_artists.is_empty() {
            query.push(("seed_artists", seed_artists.join(",")));
        }
        query.extend([
            ("min_popularity", tuning.min_popularity.to_string()),
            ("target_energy", tuning.target_energy.to_string()),
            ("limit", tuning.limit.to_string()),
        ]);

        let request = self.get(token, &["recommendations"])?.query(&query);

        let response: RecommendationsResponse = send_json(request).await?;
        Ok(response.tracks)
    }
}
