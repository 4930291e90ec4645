use serde::Deserialize;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::models::{Leaderboard, LeaderboardRow, Standing};
use super::points::level_for_points;

/// Metric the leaderboard is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardSort {
    /// Highest points first
    #[default]
    Points,
    /// Lowest footprint first
    Footprint,
}

fn compare(sort: LeaderboardSort, a: &Standing, b: &Standing) -> Ordering {
    let primary = match sort {
        LeaderboardSort::Points => b.points.cmp(&a.points),
        LeaderboardSort::Footprint => a.footprint.cmp(&b.footprint),
    };
    // Ties rank by ascending user id
    primary.then_with(|| a.user_id.cmp(&b.user_id))
}

/// Filter, order and rank standings
///
/// `search` keeps users whose name contains it, ignoring case. Ranks are
/// positions in the filtered list, so filtering changes the reported rank.
pub fn rank_standings(
    standings: Vec<Standing>,
    sort: LeaderboardSort,
    search: Option<&str>,
    current_user: Uuid,
) -> Leaderboard {
    let needle = search
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut kept: Vec<Standing> = standings
        .into_iter()
        .filter(|s| match &needle {
            Some(needle) => s.name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect();

    kept.sort_by(|a, b| compare(sort, a, b));

    let rows: Vec<LeaderboardRow> = kept
        .into_iter()
        .enumerate()
        .map(|(index, s)| LeaderboardRow {
            rank: index + 1,
            is_current_user: s.user_id == current_user,
            level: level_for_points(s.points),
            user_id: s.user_id,
            name: s.name,
            points: s.points,
            footprint: s.footprint,
        })
        .collect();

    let current_user_rank = rows.iter().find(|r| r.is_current_user).map(|r| r.rank);

    Leaderboard {
        total: rows.len(),
        current_user_rank,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn standing(n: u128, name: &str, points: i64, footprint: Decimal) -> Standing {
        Standing {
            user_id: Uuid::from_u128(n),
            name: name.to_string(),
            points,
            footprint,
        }
    }

    fn sample() -> Vec<Standing> {
        vec![
            standing(1, "Emma Wilson", 3250, dec!(42)),
            standing(2, "Liam Johnson", 2860, dec!(56)),
            standing(3, "Olivia Davis", 3780, dec!(38)),
            standing(4, "Noah Martinez", 2340, dec!(63)),
            standing(5, "John Doe", 750, dec!(78)),
            standing(6, "Ava Thompson", 1850, dec!(67)),
        ]
    }

    fn names(board: &Leaderboard) -> Vec<&str> {
        board.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_points_descending() {
        let board = rank_standings(sample(), LeaderboardSort::Points, None, Uuid::from_u128(5));
        assert_eq!(
            names(&board),
            vec!["Olivia Davis", "Emma Wilson", "Liam Johnson", "Noah Martinez", "Ava Thompson", "John Doe"]
        );
        assert_eq!(board.current_user_rank, Some(6));
        assert_eq!(board.rows[0].level, 4);
    }

    #[test]
    fn test_sort_by_footprint_ascending() {
        let board = rank_standings(sample(), LeaderboardSort::Footprint, None, Uuid::from_u128(2));
        assert_eq!(names(&board)[0], "Olivia Davis");
        assert_eq!(names(&board)[5], "John Doe");
        assert_eq!(board.current_user_rank, Some(3));
    }

    #[test]
    fn test_resorting_keeps_user_count() {
        let by_points = rank_standings(sample(), LeaderboardSort::Points, None, Uuid::nil());
        let standings: Vec<Standing> = by_points
            .rows
            .into_iter()
            .map(|r| standing(r.user_id.as_u128(), &r.name, r.points, r.footprint))
            .collect();
        let by_footprint = rank_standings(standings, LeaderboardSort::Footprint, None, Uuid::nil());
        assert_eq!(by_footprint.total, sample().len());
        assert_eq!(by_footprint.current_user_rank, None);
    }

    #[test]
    fn test_filter_recomputes_rank() {
        let board = rank_standings(sample(), LeaderboardSort::Points, Some("JOHN"), Uuid::from_u128(5));
        assert_eq!(names(&board), vec!["Liam Johnson", "John Doe"]);
        assert_eq!(board.current_user_rank, Some(2));
        assert_eq!(board.total, 2);
    }

    #[test]
    fn test_filter_can_remove_current_user() {
        let board = rank_standings(sample(), LeaderboardSort::Points, Some("emma"), Uuid::from_u128(5));
        assert_eq!(board.total, 1);
        assert_eq!(board.current_user_rank, None);
    }

    #[test]
    fn test_ties_break_by_user_id() {
        let standings = vec![
            standing(9, "Late", 100, dec!(10)),
            standing(3, "Early", 100, dec!(10)),
        ];
        let by_points = rank_standings(standings.clone(), LeaderboardSort::Points, None, Uuid::nil());
        let by_footprint = rank_standings(standings, LeaderboardSort::Footprint, None, Uuid::nil());
        assert_eq!(names(&by_points), vec!["Early", "Late"]);
        assert_eq!(names(&by_footprint), vec!["Early", "Late"]);
    }

    #[test]
    fn test_empty_search_keeps_everyone() {
        let board = rank_standings(sample(), LeaderboardSort::Points, Some(""), Uuid::nil());
        assert_eq!(board.total, 6);
    }
}
