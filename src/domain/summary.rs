use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{CarbonEntry, Category};
use super::DomainError;

/// How far back the dashboard looks
pub const SUMMARY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: Category,
    pub total: Decimal,
    /// Share of the window total, one decimal place
    pub share_percent: Decimal,
}

/// Dashboard summary cards for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintSummary {
    pub this_week: Decimal,
    pub previous_week: Decimal,
    /// Week-over-week change, `None` when there is nothing to compare against
    pub week_change_percent: Option<Decimal>,
    pub daily_average: Decimal,
    pub by_category: Vec<CategoryShare>,
    pub entry_count: usize,
}

fn one_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

fn two_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, DomainError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or(DomainError::Overflow)
}

fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(whole).map(one_dp)
}

/// Aggregate entries into summary cards as of `now`
///
/// Windows are half-open on the past side: an entry exactly seven days old
/// counts towards the previous week. Entries older than
/// [`SUMMARY_WINDOW_DAYS`] or dated after `now` are ignored.
pub fn summarize_footprint(
    entries: &[CarbonEntry],
    now: DateTime<Utc>,
) -> Result<FootprintSummary, DomainError> {
    let week_start = now - Duration::days(7);
    let previous_week_start = now - Duration::days(14);
    let window_start = now - Duration::days(SUMMARY_WINDOW_DAYS);

    let in_window: Vec<&CarbonEntry> = entries
        .iter()
        .filter(|e| e.date > window_start && e.date <= now)
        .collect();

    let sum = |from: DateTime<Utc>, to: DateTime<Utc>| {
        checked_sum(
            in_window
                .iter()
                .filter(|e| e.date > from && e.date <= to)
                .map(|e| e.amount),
        )
    };

    let this_week = sum(week_start, now)?;
    let previous_week = sum(previous_week_start, week_start)?;
    let window_total = checked_sum(in_window.iter().map(|e| e.amount))?;

    let by_category = Category::ALL
        .iter()
        .map(|&category| {
            let total = checked_sum(
                in_window
                    .iter()
                    .filter(|e| e.category == category)
                    .map(|e| e.amount),
            )?;
            Ok(CategoryShare {
                category,
                total: two_dp(total),
                share_percent: percent_of(total, window_total).unwrap_or(Decimal::ZERO),
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    let week_change = this_week
        .checked_sub(previous_week)
        .ok_or(DomainError::Overflow)?;

    Ok(FootprintSummary {
        this_week: two_dp(this_week),
        previous_week: two_dp(previous_week),
        week_change_percent: percent_of(week_change, previous_week),
        daily_average: two_dp(window_total / Decimal::from(SUMMARY_WINDOW_DAYS)),
        by_category,
        entry_count: in_window.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryDetails;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn entry(category: Category, amount: Decimal, days_ago: i64) -> CarbonEntry {
        CarbonEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            category,
            amount,
            details: EntryDetails::default(),
            date: now() - Duration::days(days_ago) + Duration::minutes(1),
        }
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize_footprint(&[], now()).unwrap();
        assert_eq!(summary.this_week, Decimal::ZERO);
        assert_eq!(summary.week_change_percent, None);
        assert_eq!(summary.entry_count, 0);
        assert!(summary.by_category.iter().all(|c| c.share_percent.is_zero()));
    }

    #[test]
    fn test_week_over_week_change() {
        let entries = vec![
            entry(Category::Transport, dec!(10), 1),
            entry(Category::Food, dec!(5.5), 3),
            entry(Category::Transport, dec!(20), 8),
        ];
        let summary = summarize_footprint(&entries, now()).unwrap();
        assert_eq!(summary.this_week, dec!(15.5));
        assert_eq!(summary.previous_week, dec!(20));
        // (15.5 - 20) / 20 = -22.5%
        assert_eq!(summary.week_change_percent, Some(dec!(-22.5)));
    }

    #[test]
    fn test_category_shares_and_average() {
        let entries = vec![
            entry(Category::Transport, dec!(30), 2),
            entry(Category::Home, dec!(15), 10),
            entry(Category::Waste, dec!(15), 20),
            entry(Category::Food, dec!(100), 45),
        ];
        let summary = summarize_footprint(&entries, now()).unwrap();
        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.daily_average, dec!(2));

        let shares: Vec<(Category, Decimal)> = summary
            .by_category
            .iter()
            .map(|c| (c.category, c.share_percent))
            .collect();
        assert_eq!(shares, vec![
            (Category::Transport, dec!(50)),
            (Category::Home, dec!(25)),
            (Category::Food, dec!(0)),
            (Category::Waste, dec!(25)),
        ]);
    }

    #[test]
    fn test_future_entries_ignored() {
        let entries = vec![entry(Category::Waste, dec!(4), -2)];
        let summary = summarize_footprint(&entries, now()).unwrap();
        assert_eq!(summary.entry_count, 0);
    }

    #[test]
    fn test_totals_beyond_decimal_range_are_an_error() {
        let entries = vec![
            entry(Category::Transport, Decimal::MAX, 1),
            entry(Category::Transport, Decimal::MAX, 2),
        ];
        assert_eq!(summarize_footprint(&entries, now()), Err(DomainError::Overflow));
    }
}
