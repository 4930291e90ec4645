use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::str::FromStr;

use crate::models::{Achievement, AchievementCategory, AchievementSummary, AchievementView};

fn criteria(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn unlocked_on(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The achievement catalog, in display order
pub static ACHIEVEMENT_CATALOG: Lazy<Vec<Achievement>> = Lazy::new(|| {
    vec![
        Achievement {
            id: "1",
            title: "First Steps",
            description: "Complete your first carbon footprint calculation",
            icon: "leaf",
            points: 50,
            category: AchievementCategory::Beginner,
            unlocked: true,
            unlocked_on: unlocked_on(2023, 4, 15),
            progress: None,
            criteria: criteria(json!({"entries": 1})),
        },
        Achievement {
            id: "2",
            title: "Profile Perfectionist",
            description: "Complete your profile with all details",
            icon: "star",
            points: 25,
            category: AchievementCategory::Beginner,
            unlocked: true,
            unlocked_on: unlocked_on(2023, 4, 16),
            progress: None,
            criteria: criteria(json!({"profileComplete": true})),
        },
        Achievement {
            id: "3",
            title: "Carbon Conscious",
            description: "Calculate your footprint 5 days in a row",
            icon: "trending-up",
            points: 100,
            category: AchievementCategory::Regular,
            unlocked: true,
            unlocked_on: unlocked_on(2023, 5, 2),
            progress: None,
            criteria: criteria(json!({"consecutiveDays": 5})),
        },
        Achievement {
            id: "4",
            title: "Zero Waste Week",
            description: "Reduce your waste to less than 1kg for a week",
            icon: "zap",
            points: 150,
            category: AchievementCategory::Waste,
            unlocked: true,
            unlocked_on: unlocked_on(2023, 5, 17),
            progress: None,
            criteria: criteria(json!({"category": "waste", "maxWeeklyKg": 1})),
        },
        Achievement {
            id: "5",
            title: "Green Commuter",
            description: "Use eco-friendly transportation for 10 days",
            icon: "heart",
            points: 200,
            category: AchievementCategory::Transport,
            unlocked: false,
            unlocked_on: None,
            progress: Some(60),
            criteria: criteria(json!({"category": "transport", "modes": ["bus", "train"], "days": 10})),
        },
        Achievement {
            id: "6",
            title: "Energy Saver",
            description: "Reduce energy consumption by 20% from your baseline",
            icon: "zap",
            points: 250,
            category: AchievementCategory::Home,
            unlocked: false,
            unlocked_on: None,
            progress: Some(45),
            criteria: criteria(json!({"category": "home", "reductionPercent": 20})),
        },
        Achievement {
            id: "7",
            title: "Plant-Based Pioneer",
            description: "Choose plant-based meals for 7 consecutive days",
            icon: "leaf",
            points: 175,
            category: AchievementCategory::Food,
            unlocked: false,
            unlocked_on: None,
            progress: Some(30),
            criteria: criteria(json!({"category": "food", "mealTypes": ["vegetarian", "vegan"], "consecutiveDays": 7})),
        },
        Achievement {
            id: "8",
            title: "Climate Champion",
            description: "Maintain a carbon footprint 30% below average for a month",
            icon: "trophy",
            points: 500,
            category: AchievementCategory::Advanced,
            unlocked: false,
            unlocked_on: None,
            progress: Some(10),
            criteria: criteria(json!({"belowAveragePercent": 30, "days": 30})),
        },
        Achievement {
            id: "9",
            title: "Eco Influencer",
            description: "Invite 5 friends to join EcoStep",
            icon: "medal",
            points: 300,
            category: AchievementCategory::Social,
            unlocked: false,
            unlocked_on: None,
            progress: Some(20),
            criteria: criteria(json!({"invites": 5})),
        },
    ]
});

/// Which slice of the catalog to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AchievementFilter {
    #[default]
    All,
    Unlocked,
    Locked,
    Category(AchievementCategory),
}

impl FromStr for AchievementFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "unlocked" => Ok(Self::Unlocked),
            "locked" => Ok(Self::Locked),
            other => other.parse().map(Self::Category),
        }
    }
}

impl AchievementFilter {
    pub fn matches(&self, achievement: &Achievement) -> bool {
        match self {
            Self::All => true,
            Self::Unlocked => achievement.unlocked,
            Self::Locked => !achievement.unlocked,
            Self::Category(category) => achievement.category == *category,
        }
    }
}

/// Summary counts always cover the whole catalog, whatever the filter
pub fn summarize_achievements(catalog: &[Achievement]) -> AchievementSummary {
    let total = catalog.len();
    let unlocked: Vec<&Achievement> = catalog.iter().filter(|a| a.unlocked).collect();
    let points_earned = unlocked.iter().map(|a| a.points).sum();

    // Rounded half-up percentage
    let progress_percent = if total == 0 {
        0
    } else {
        ((unlocked.len() * 200 + total) / (total * 2)) as u32
    };

    AchievementSummary {
        unlocked: unlocked.len(),
        total,
        points_earned,
        progress_percent,
    }
}

pub fn achievement_view(filter: AchievementFilter) -> AchievementView {
    AchievementView {
        achievements: ACHIEVEMENT_CATALOG
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect(),
        summary: summarize_achievements(&ACHIEVEMENT_CATALOG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_summary() {
        let summary = summarize_achievements(&ACHIEVEMENT_CATALOG);
        assert_eq!(summary, AchievementSummary {
            unlocked: 4,
            total: 9,
            points_earned: 325,
            progress_percent: 44,
        });
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<AchievementFilter>().unwrap(), AchievementFilter::All);
        assert_eq!("locked".parse::<AchievementFilter>().unwrap(), AchievementFilter::Locked);
        assert_eq!(
            "waste".parse::<AchievementFilter>().unwrap(),
            AchievementFilter::Category(AchievementCategory::Waste)
        );
        assert!("legendary".parse::<AchievementFilter>().is_err());
    }

    #[test]
    fn test_unlocked_and_locked_partition_catalog() {
        let unlocked = achievement_view(AchievementFilter::Unlocked).achievements;
        let locked = achievement_view(AchievementFilter::Locked).achievements;
        assert_eq!(unlocked.len() + locked.len(), ACHIEVEMENT_CATALOG.len());
        assert!(unlocked.iter().all(|a| a.unlocked && a.unlocked_on.is_some()));
        assert!(locked.iter().all(|a| !a.unlocked && a.progress.is_some()));
    }

    #[test]
    fn test_category_filter_keeps_summary_global() {
        let view = achievement_view(AchievementFilter::Category(AchievementCategory::Beginner));
        let titles: Vec<&str> = view.achievements.iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["First Steps", "Profile Perfectionist"]);
        assert_eq!(view.summary.total, 9);
    }

    #[test]
    fn test_progress_rounding() {
        let mut catalog: Vec<Achievement> = ACHIEVEMENT_CATALOG.iter().take(3).cloned().collect();
        catalog[0].unlocked = true;
        catalog[1].unlocked = true;
        catalog[2].unlocked = false;
        // 2/3 = 66.67% -> 67
        assert_eq!(summarize_achievements(&catalog).progress_percent, 67);
        assert_eq!(summarize_achievements(&[]).progress_percent, 0);
    }
}
