use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::errors::{award_error, Result, StoreError};
use crate::db::store::Store;
use crate::models::{
    CarbonEntry, EntryDetails, NewCarbonEntry, NewUser, ProfileUpdate, RecordedEntry, Standing,
    User, UserCredentials,
};

const USER_COLUMNS: &str = "id, name, email, points, avatar_url, created_at";

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    name: String,
    email: String,
    points: i64,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl From<CredentialsRow> for UserCredentials {
    fn from(row: CredentialsRow) -> Self {
        UserCredentials {
            user: User {
                id: row.id,
                name: row.name,
                email: row.email,
                points: row.points,
                avatar_url: row.avatar_url,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    user_id: Uuid,
    category: String,
    amount: Decimal,
    details: Json<EntryDetails>,
    date: DateTime<Utc>,
}

impl TryFrom<EntryRow> for CarbonEntry {
    type Error = StoreError;

    fn try_from(row: EntryRow) -> Result<Self> {
        Ok(CarbonEntry {
            id: row.id,
            user_id: row.user_id,
            category: row.category.parse().map_err(StoreError::InvalidData)?,
            amount: row.amount,
            details: row.details.0,
            date: row.date,
        })
    }
}

fn into_entries(rows: Vec<EntryRow>) -> Result<Vec<CarbonEntry>> {
    rows.into_iter().map(CarbonEntry::try_from).collect()
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, points, created_at)
            VALUES ($1, $2, $3, $4, 0, NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = StoreError::QueryError(e);
            if err.is_unique_violation() {
                StoreError::Conflict(format!("email already registered: {}", user.email))
            } else {
                err
            }
        })?;

        info!(user_id = %created.id, "Created user");
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserCredentials::from))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                avatar_url = COALESCE($3, avatar_url)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn increment_points(&self, user_id: Uuid, delta: i64) -> Result<Option<i64>> {
        // Single statement so concurrent awards serialize on the row lock
        let total: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET points = points + $1 WHERE id = $2 RETURNING points",
        )
        .bind(delta)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| award_error(e, user_id))?;

        Ok(total)
    }

    #[tracing::instrument(
        skip(self, entry),
        fields(user_id = %entry.user_id, category = %entry.category, points = points)
    )]
    async fn record_entry(&self, entry: NewCarbonEntry, points: i64) -> Result<RecordedEntry> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO carbon_entries (id, user_id, category, amount, details, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(entry.user_id)
        .bind(entry.category.as_str())
        .bind(entry.amount)
        .bind(Json(&entry.details))
        .bind(entry.date)
        .execute(&mut *tx)
        .await?;

        let total_points: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET points = points + $1 WHERE id = $2 RETURNING points",
        )
        .bind(points)
        .bind(entry.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| award_error(e, entry.user_id))?;

        tx.commit().await?;

        if total_points.is_none() {
            debug!("Owner not found, entry stored without award");
        }

        Ok(RecordedEntry {
            points_awarded: if total_points.is_some() { points } else { 0 },
            total_points,
            entry: entry.into_entry(id),
        })
    }

    async fn recent_entries(&self, user_id: Uuid, limit: i64) -> Result<Vec<CarbonEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, user_id, category, amount, details, date
            FROM carbon_entries
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn entries_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<CarbonEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, user_id, category, amount, details, date
            FROM carbon_entries
            WHERE user_id = $1 AND date > $2
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn standings(&self, since: DateTime<Utc>) -> Result<Vec<Standing>> {
        let standings = sqlx::query_as::<_, Standing>(
            r#"
            SELECT u.id AS user_id,
                   u.name,
                   u.points,
                   COALESCE(SUM(e.amount), 0) AS footprint
            FROM users u
            LEFT JOIN carbon_entries e
                ON e.user_id = u.id AND e.date > $1
            GROUP BY u.id, u.name, u.points
            ORDER BY u.id
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(standings)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
