use axum::Json;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiQuery;
use crate::domain::{achievement_view, AchievementFilter};
use crate::models::AchievementView;

#[derive(Debug, Default, Deserialize)]
pub struct AchievementParams {
    pub filter: Option<String>,
}

/// Catalog listing; `filter` is `all`, `unlocked`, `locked` or a category name
#[tracing::instrument]
pub async fn list_achievements_handler(
    ApiQuery(params): ApiQuery<AchievementParams>,
) -> ApiResult<Json<AchievementView>> {
    let filter = match params.filter.as_deref() {
        None | Some("") => AchievementFilter::All,
        Some(raw) => raw
            .parse()
            .map_err(|e: String| ApiError::BadRequest(format!("Invalid filter: {}", e)))?,
    };

    Ok(Json(achievement_view(filter)))
}
