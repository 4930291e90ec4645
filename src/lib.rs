pub mod config;
pub mod models;
pub mod db;
pub mod auth;
pub mod domain;
pub mod api;

// Re-export commonly used types
pub use config::{Config, ConfigError, StoreBackend};

pub use models::{
    CarbonEntry, Category, EntryDetails, NewCarbonEntry, RecordedEntry,
    User, UserProfile, Standing,
};

pub use db::{MemoryStore, PgStore, Store, StoreError};

pub use domain::{
    estimate, try_estimate, points_awarded, level_for_points,
    rank_standings, LeaderboardSort, DomainError,
};

pub use auth::{TokenService, PasswordHasher};
