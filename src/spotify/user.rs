use super::{SpotifyClient, send_json};
use crate::{Res, types::UserProfile};

impl SpotifyClient {
    /// Fetches the profile of the user owning `token` (`GET /me`).
    pub async fn current_user(&self, token: &str) -> Res<UserProfile> {
        send_json(self.get(token, &["me"])?).await
    }
}
