use axum::{extract::State, Json};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, AuthUser};
use crate::api::state::AppState;
use crate::auth::validation::validate_name;
use crate::models::{ProfileUpdate, UserProfile};

#[tracing::instrument(skip(state))]
pub async fn get_profile_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.to_profile()))
}

#[tracing::instrument(skip(state, update))]
pub async fn update_profile_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    if let Some(name) = &update.name {
        if let Some(error) = validate_name(name) {
            return Err(ApiError::Validation(vec![error]));
        }
    }

    let update = ProfileUpdate {
        name: update.name.map(|n| n.trim().to_string()),
        avatar_url: update
            .avatar_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()),
    };

    let user = state
        .store
        .update_profile(user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!("Profile updated");

    Ok(Json(user.to_profile()))
}
