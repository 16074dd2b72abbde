use super::{SpotifyClient, send_json};
use crate::{
    Res,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

impl SpotifyClient {
    /// Creates a private, non-collaborative playlist owned by `user_id`.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token of the user the playlist is created for
    /// * `user_id` - Spotify id of that same user
    /// * `name` - Display name of the new playlist
    /// * `description` - Description shown under the playlist name
    ///
    /// # Returns
    ///
    /// The created playlist as reported by Spotify. Creating a playlist is not
    /// idempotent: calling this twice yields two playlists.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Res<CreatePlaylistResponse> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };

        let request = self
            .post(token, &["users", user_id, "playlists"])?
            .json(&body);
        send_json(request).await
    }

    /// Appends `uris` to the playlist in a single request.
    ///
    /// Spotify accepts up to 100 URIs per call; the relay never sends more
    /// than the top-items page size.
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: Vec<String>,
    ) -> Res<AddTrackToPlaylistResponse> {
        let request = self
            .post(token, &["playlists", playlist_id, "tracks"])?
            .json(&AddTrackToPlaylistRequest { uris });
        send_json(request).await
    }
}
