use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query execution error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Check if this is a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Conflict(_) => true,
            Self::QueryError(e) => e
                .as_database_error()
                .map(|db_error| db_error.code().as_deref() == Some("23505"))
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Map a failed point award; BIGINT overflow (22003) becomes `InvalidData`
/// like the in-memory store reports it
pub(crate) fn award_error(err: sqlx::Error, user_id: uuid::Uuid) -> StoreError {
    let out_of_range = err
        .as_database_error()
        .map(|db_error| db_error.code().as_deref() == Some("22003"))
        .unwrap_or(false);

    if out_of_range {
        StoreError::InvalidData(format!("point total out of range for {}", user_id))
    } else {
        StoreError::QueryError(err)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
