use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::DomainError;

/// Bonus for tracking an activity at all, before emissions are subtracted
pub const TRACKING_BONUS: i64 = 50;

/// Every submission earns at least this many points
pub const PARTICIPATION_FLOOR: i64 = 10;

pub const POINTS_PER_LEVEL: i64 = 1000;

/// Largest accepted entry, in kg CO2e
pub const MAX_ENTRY_AMOUNT: i64 = 1_000_000;

/// Reject amounts outside `0..=MAX_ENTRY_AMOUNT`
pub fn validate_amount(amount: Decimal) -> Result<Decimal, DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::InvalidAmount("amount must not be negative".to_string()));
    }
    if amount > Decimal::from(MAX_ENTRY_AMOUNT) {
        return Err(DomainError::InvalidAmount(format!(
            "amount must not exceed {}",
            MAX_ENTRY_AMOUNT
        )));
    }
    Ok(amount)
}

/// Points for logging an entry of `amount` kg CO2e
///
/// `max(floor(50 - amount), 10)`: larger emissions earn less, down to the
/// participation floor. The category plays no part.
pub fn points_awarded(amount: Decimal) -> i64 {
    let earned = match Decimal::from(TRACKING_BONUS).checked_sub(amount) {
        Some(remaining) => remaining.floor().to_i64().unwrap_or(if remaining.is_sign_negative() {
            PARTICIPATION_FLOOR
        } else {
            i64::MAX
        }),
        // Only reachable for amounts near the negative limit of Decimal
        None => i64::MAX,
    };

    earned.max(PARTICIPATION_FLOOR)
}

/// Level derived from a point total; new users start at level 1
pub fn level_for_points(points: i64) -> i64 {
    points.max(0) / POINTS_PER_LEVEL + 1
}
