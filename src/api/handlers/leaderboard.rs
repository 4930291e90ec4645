use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiQuery, AuthUser};
use crate::api::state::AppState;
use crate::domain::{rank_standings, LeaderboardSort};
use crate::models::Leaderboard;

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    #[serde(default)]
    pub sort: LeaderboardSort,
    pub search: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn leaderboard_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(params): ApiQuery<LeaderboardParams>,
) -> ApiResult<Json<Leaderboard>> {
    let since = Utc::now()
        .checked_sub_signed(state.leaderboard_window)
        .ok_or_else(|| ApiError::Internal("Leaderboard window out of range".to_string()))?;
    let standings = state.store.standings(since).await?;

    Ok(Json(rank_standings(
        standings,
        params.sort,
        params.search.as_deref().map(str::trim),
        user_id,
    )))
}
