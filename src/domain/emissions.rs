use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Category, EntryDetails};
use super::DomainError;

/// A selectable option within a category and its emission factor
///
/// Factors are kg CO2e per unit of the category's quantity (km, kWh, kg),
/// or per meal for food where no quantity applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionOption {
    pub id: &'static str,
    pub name: &'static str,
    pub factor: Decimal,
}

fn option(id: &'static str, name: &'static str, mantissa: i64, scale: u32) -> EmissionOption {
    EmissionOption {
        id,
        name,
        factor: Decimal::new(mantissa, scale),
    }
}

/// Static per-category factor tables
pub static EMISSION_FACTORS: Lazy<HashMap<Category, Vec<EmissionOption>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(Category::Transport, vec![
        option("car", "Car", 2, 1),
        option("bus", "Bus", 8, 2),
        option("train", "Train", 4, 2),
        option("plane", "Plane", 25, 2),
    ]);
    m.insert(Category::Home, vec![
        option("coal", "Coal", 9, 1),
        option("natural-gas", "Natural Gas", 4, 1),
        option("renewable", "Renewable", 1, 2),
        option("mixed", "Mixed Sources", 5, 1),
    ]);
    m.insert(Category::Food, vec![
        option("meat-heavy", "Meat Heavy", 33, 1),
        option("balanced", "Balanced", 25, 1),
        option("vegetarian", "Vegetarian", 17, 1),
        option("vegan", "Vegan", 15, 1),
    ]);
    m.insert(Category::Waste, vec![
        option("landfill", "Landfill", 5, 1),
        option("recycled", "Recycled", 1, 1),
        option("composted", "Composted", 5, 2),
    ]);
    m
});

/// Options offered for a category, in display order
pub fn emission_options(category: Category) -> &'static [EmissionOption] {
    EMISSION_FACTORS
        .get(&category)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn lookup_factor(category: Category, option_id: &str) -> Option<Decimal> {
    emission_options(category)
        .iter()
        .find(|o| o.id == option_id)
        .map(|o| o.factor)
}

/// Which details field names the option for a category
fn selected_option(category: Category, details: &EntryDetails) -> Option<&str> {
    match category {
        Category::Transport => details.transport_type(),
        Category::Home => details.energy_source(),
        Category::Food => details.meal_type(),
        Category::Waste => details.waste_type(),
    }
}

/// The quantity the factor multiplies. Food is a flat per-meal factor
fn quantity(category: Category, details: &EntryDetails) -> Option<Option<Decimal>> {
    match category {
        Category::Transport => Some(details.distance()),
        Category::Home => Some(details.energy_usage()),
        Category::Food => None,
        Category::Waste => Some(details.amount()),
    }
}

fn compute(category: Category, factor: Decimal, details: &EntryDetails) -> Option<Decimal> {
    let raw = match quantity(category, details) {
        None => factor,
        Some(q) => {
            // Missing or negative quantities count as zero
            let q = q.filter(|q| !q.is_sign_negative()).unwrap_or(Decimal::ZERO);
            q.checked_mul(factor)?
        }
    };
    Some(raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Estimate kg CO2e for an activity, rounded half-up to 2 decimal places
///
/// Unknown or missing option ids resolve to a factor of 0, and missing,
/// negative or overflowing quantities also give 0. The result is never
/// negative. Use [`try_estimate`] to reject unknown options instead.
pub fn estimate(category: Category, details: &EntryDetails) -> Decimal {
    let factor = selected_option(category, details)
        .and_then(|id| lookup_factor(category, id))
        .unwrap_or(Decimal::ZERO);

    compute(category, factor, details).unwrap_or(Decimal::ZERO)
}

/// Like [`estimate`] but an absent or unrecognised option id is an error
pub fn try_estimate(category: Category, details: &EntryDetails) -> Result<Decimal, DomainError> {
    let option_id = selected_option(category, details)
        .ok_or(DomainError::MissingOption { category })?;

    let factor = lookup_factor(category, option_id).ok_or_else(|| DomainError::UnknownOption {
        category,
        option: option_id.to_string(),
    })?;

    compute(category, factor, details)
        .ok_or_else(|| DomainError::InvalidAmount("quantity too large".to_string()))
}
