use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const DATABASE_MAX_CONNECTIONS_RANGE: RangeInclusive<u32> = 1..=100;
/// One minute to one year
pub const JWT_TTL_SECONDS_RANGE: RangeInclusive<i64> = 60..=365 * 24 * 60 * 60;
pub const PASSWORD_HASH_ITERATIONS_RANGE: RangeInclusive<u32> = 1..=10_000_000;
pub const LEADERBOARD_WINDOW_DAYS_RANGE: RangeInclusive<i64> = 1..=3650;

/// Which persistence backend the server runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration
/// Everything is read from the environment (a `.env` file is loaded first by `run_server`)
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub password_hash_iterations: u32,
    pub leaderboard_window_days: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::Postgres,
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        // JWT_SECRET wins, SECRET_KEY is accepted for older deployments
        let jwt_secret = env::var("JWT_SECRET")
            .or_else(|_| env::var("SECRET_KEY"))
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
            .trim_matches('"')
            .to_string();

        let config = Self {
            port: parse_var("PORT", 5000)?,
            store_backend,
            database_url,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_ttl_seconds: parse_var("JWT_TTL_SECONDS", 7 * 24 * 60 * 60)?,
            password_hash_iterations: parse_var("PASSWORD_HASH_ITERATIONS", 600_000)?,
            leaderboard_window_days: parse_var("LEADERBOARD_WINDOW_DAYS", 7)?,
        };
        config.validate()?;

        Ok(config)
    }

    /// Check numeric settings against their accepted ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "DATABASE_MAX_CONNECTIONS",
            self.database_max_connections,
            DATABASE_MAX_CONNECTIONS_RANGE,
        )?;
        check_range("JWT_TTL_SECONDS", self.jwt_ttl_seconds, JWT_TTL_SECONDS_RANGE)?;
        check_range(
            "PASSWORD_HASH_ITERATIONS",
            self.password_hash_iterations,
            PASSWORD_HASH_ITERATIONS_RANGE,
        )?;
        check_range(
            "LEADERBOARD_WINDOW_DAYS",
            self.leaderboard_window_days,
            LEADERBOARD_WINDOW_DAYS_RANGE,
        )?;
        Ok(())
    }

    /// Settings for tests and local runs without a database
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self {
            port: 0,
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            jwt_secret: jwt_secret.to_string(),
            jwt_ttl_seconds: 3600,
            // Cheap hashing keeps test suites fast
            password_hash_iterations: 1_000,
            leaderboard_window_days: 7,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

fn check_range<T: PartialOrd + Display>(
    key: &'static str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        let value: u32 = parse_var("ECOSTEP_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_in_memory_config() {
        let config = Config::in_memory("secret");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.database_url.is_none());
        assert_eq!(config.leaderboard_window_days, 7);
    }

    #[test]
    fn test_in_memory_config_is_valid() {
        assert!(Config::in_memory("secret").validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let mut config = Config::in_memory("secret");
        config.leaderboard_window_days = 1_000_000_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "LEADERBOARD_WINDOW_DAYS", .. })
        ));

        let mut config = Config::in_memory("secret");
        config.leaderboard_window_days = -7;
        assert!(config.validate().is_err());

        let mut config = Config::in_memory("secret");
        config.jwt_ttl_seconds = i64::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "JWT_TTL_SECONDS", .. })
        ));

        let mut config = Config::in_memory("secret");
        config.jwt_ttl_seconds = -3600;
        assert!(config.validate().is_err());

        let mut config = Config::in_memory("secret");
        config.database_max_connections = 0;
        assert!(config.validate().is_err());
    }
}
