use chrono::Duration;
use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::{Config, ConfigError};
use crate::db::Store;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
    /// Footprint window used for leaderboard standings
    pub leaderboard_window: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let invalid = |key: &'static str, value: i64| ConfigError::Invalid {
            key,
            value: value.to_string(),
        };

        let token_ttl = Duration::try_seconds(config.jwt_ttl_seconds)
            .ok_or_else(|| invalid("JWT_TTL_SECONDS", config.jwt_ttl_seconds))?;
        let leaderboard_window = Duration::try_days(config.leaderboard_window_days)
            .ok_or_else(|| invalid("LEADERBOARD_WINDOW_DAYS", config.leaderboard_window_days))?;

        Ok(Self {
            store,
            tokens: TokenService::new(&config.jwt_secret, token_ttl),
            passwords: PasswordHasher::new(config.password_hash_iterations),
            leaderboard_window,
        })
    }
}
