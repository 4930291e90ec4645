use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Beginner,
    Regular,
    Transport,
    Home,
    Food,
    Waste,
    Advanced,
    Social,
    General,
}

impl FromStr for AchievementCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "regular" => Ok(Self::Regular),
            "transport" => Ok(Self::Transport),
            "home" => Ok(Self::Home),
            "food" => Ok(Self::Food),
            "waste" => Ok(Self::Waste),
            "advanced" => Ok(Self::Advanced),
            "social" => Ok(Self::Social),
            "general" => Ok(Self::General),
            other => Err(format!("unknown achievement category: {}", other)),
        }
    }
}

/// Static catalog entry
///
/// `unlocked` is catalog data, it is not derived from a user's entries.
/// `criteria` is carried for clients but never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub points: i64,
    pub category: AchievementCategory,
    pub unlocked: bool,
    #[serde(rename = "date", skip_serializing_if = "Option::is_none")]
    pub unlocked_on: Option<NaiveDate>,
    /// Percent towards unlocking, only meaningful while locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    pub criteria: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementSummary {
    pub unlocked: usize,
    pub total: usize,
    pub points_earned: i64,
    pub progress_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementView {
    pub achievements: Vec<Achievement>,
    pub summary: AchievementSummary,
}
