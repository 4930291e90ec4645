use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Activity category of a carbon entry
///
/// The calculator historically called the home and food categories
/// "energy" and "diet"; both spellings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Transport,
    #[serde(alias = "energy")]
    Home,
    #[serde(alias = "diet")]
    Food,
    Waste,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Transport, Self::Home, Self::Food, Self::Waste];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Home => "home",
            Self::Food => "food",
            Self::Waste => "waste",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transport" => Ok(Self::Transport),
            "home" | "energy" => Ok(Self::Home),
            "food" | "diet" => Ok(Self::Food),
            "waste" => Ok(Self::Waste),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Category-specific inputs attached to an entry
///
/// The object is stored and returned exactly as the client sent it. The
/// estimator reads the keys it knows through the typed accessors; numeric
/// keys accept numbers or numeric strings and anything else reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryDetails(Map<String, Value>);

impl EntryDetails {
    pub const TRANSPORT_TYPE: &'static str = "transportType";
    pub const DISTANCE: &'static str = "distance";
    pub const ENERGY_SOURCE: &'static str = "energySource";
    pub const ENERGY_USAGE: &'static str = "energyUsage";
    pub const MEAL_TYPE: &'static str = "mealType";
    pub const WASTE_TYPE: &'static str = "wasteType";
    pub const AMOUNT: &'static str = "amount";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn number(&self, key: &str) -> Option<Decimal> {
        match self.0.get(key)? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
    }

    pub fn transport_type(&self) -> Option<&str> {
        self.text(Self::TRANSPORT_TYPE)
    }

    pub fn distance(&self) -> Option<Decimal> {
        self.number(Self::DISTANCE)
    }

    pub fn energy_source(&self) -> Option<&str> {
        self.text(Self::ENERGY_SOURCE)
    }

    pub fn energy_usage(&self) -> Option<Decimal> {
        self.number(Self::ENERGY_USAGE)
    }

    pub fn meal_type(&self) -> Option<&str> {
        self.text(Self::MEAL_TYPE)
    }

    pub fn waste_type(&self) -> Option<&str> {
        self.text(Self::WASTE_TYPE)
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.number(Self::AMOUNT)
    }
}

impl From<Map<String, Value>> for EntryDetails {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// A persisted carbon entry. Entries are immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonEntry {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub category: Category,
    /// kg CO2e as submitted by the client
    pub amount: Decimal,
    pub details: EntryDetails,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCarbonEntry {
    pub user_id: Uuid,
    pub category: Category,
    pub amount: Decimal,
    pub details: EntryDetails,
    pub date: DateTime<Utc>,
}

impl NewCarbonEntry {
    pub fn into_entry(self, id: Uuid) -> CarbonEntry {
        CarbonEntry {
            id,
            user_id: self.user_id,
            category: self.category,
            amount: self.amount,
            details: self.details,
            date: self.date,
        }
    }
}

/// Outcome of persisting an entry and applying its award
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEntry {
    #[serde(flatten)]
    pub entry: CarbonEntry,
    /// Points actually applied; 0 when the owning user no longer exists
    pub points_awarded: i64,
    /// The user's total after the award, `None` when the user was not found
    pub total_points: Option<i64>,
}
