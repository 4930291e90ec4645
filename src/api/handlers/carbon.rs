use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, AuthUser};
use crate::api::state::AppState;
use crate::domain::summary::SUMMARY_WINDOW_DAYS;
use crate::domain::{
    emission_options, points_awarded, summarize_footprint, try_estimate, validate_amount,
    EmissionOption, FootprintSummary,
};
use crate::models::{CarbonEntry, Category, EntryDetails, NewCarbonEntry, RecordedEntry};

/// Entries returned by the history listing
pub const RECENT_ENTRIES_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub category: Category,
    pub amount: Decimal,
    #[serde(default)]
    pub details: EntryDetails,
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub category: Category,
    #[serde(default)]
    pub details: EntryDetails,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub category: Category,
    pub co2e: Decimal,
}

#[tracing::instrument(skip(state, request), fields(category = %request.category))]
pub async fn create_entry_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<RecordedEntry>)> {
    let amount = validate_amount(request.amount)?;
    let points = points_awarded(amount);

    let recorded = state
        .store
        .record_entry(
            NewCarbonEntry {
                user_id,
                category: request.category,
                amount,
                details: request.details,
                date: Utc::now(),
            },
            points,
        )
        .await
        .map_err(|e| ApiError::storage("Error saving carbon entry", e))?;

    info!(
        entry_id = %recorded.entry.id,
        points_awarded = recorded.points_awarded,
        total_points = ?recorded.total_points,
        "Recorded carbon entry"
    );

    Ok((StatusCode::CREATED, Json(recorded)))
}

#[tracing::instrument(skip(state))]
pub async fn list_entries_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<CarbonEntry>>> {
    let entries = state
        .store
        .recent_entries(user_id, RECENT_ENTRIES_LIMIT)
        .await
        .map_err(|e| ApiError::storage("Error fetching carbon entries", e))?;

    Ok(Json(entries))
}

#[tracing::instrument(skip(request), fields(category = %request.category))]
pub async fn estimate_handler(
    ApiJson(request): ApiJson<EstimateRequest>,
) -> ApiResult<Json<EstimateResponse>> {
    let co2e = try_estimate(request.category, &request.details)?;

    Ok(Json(EstimateResponse {
        category: request.category,
        co2e,
    }))
}

pub async fn emission_factors_handler() -> Json<BTreeMap<Category, &'static [EmissionOption]>> {
    Json(
        Category::ALL
            .iter()
            .map(|&category| (category, emission_options(category)))
            .collect(),
    )
}

#[tracing::instrument(skip(state))]
pub async fn summary_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<FootprintSummary>> {
    let now = Utc::now();
    let entries = state
        .store
        .entries_since(user_id, now - Duration::days(SUMMARY_WINDOW_DAYS))
        .await
        .map_err(|e| ApiError::storage("Error fetching carbon entries", e))?;

    Ok(Json(summarize_footprint(&entries, now)?))
}
