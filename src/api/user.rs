use axum::{Json, extract::State};

use super::{ApiError, BearerToken};
use crate::{server::AppState, types::UserSummary};

pub async fn user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<UserSummary>, ApiError> {
    let profile = state
        .spotify
        .current_user(&token)
        .await
        .map_err(|e| ApiError::upstream("Error fetching user details", e))?;

    Ok(Json(profile.into()))
}
