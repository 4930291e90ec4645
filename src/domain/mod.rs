// Domain layer - pure scoring and aggregation logic with no HTTP or storage concerns

pub mod emissions;
pub mod points;
pub mod leaderboard;
pub mod achievements;
pub mod summary;

use crate::models::Category;

// Domain error type - no HTTP concerns
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown {category} option: {option}")]
    UnknownOption { category: Category, option: String },

    #[error("Missing {category} option")]
    MissingOption { category: Category },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Footprint total out of range")]
    Overflow,
}

// Re-export commonly used types and functions
pub use emissions::{estimate, try_estimate, emission_options, EmissionOption, EMISSION_FACTORS};
pub use points::{points_awarded, level_for_points, validate_amount, MAX_ENTRY_AMOUNT};
pub use leaderboard::{rank_standings, LeaderboardSort};
pub use achievements::{achievement_view, AchievementFilter, ACHIEVEMENT_CATALOG};
pub use summary::{summarize_footprint, FootprintSummary};
