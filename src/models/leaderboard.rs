use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One user's leaderboard inputs: lifetime points and recent footprint (kg CO2e)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Standing {
    pub user_id: Uuid,
    pub name: String,
    pub points: i64,
    pub footprint: Decimal,
}

/// A ranked leaderboard row as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: Uuid,
    pub name: String,
    pub level: i64,
    pub points: i64,
    pub footprint: Decimal,
    pub is_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>,
    /// 1-based rank of the requesting user in `rows`, if present after filtering
    pub current_user_rank: Option<usize>,
    pub total: usize,
}
