use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::errors::Result;
use crate::models::{
    CarbonEntry, NewCarbonEntry, NewUser, ProfileUpdate, RecordedEntry, Standing, User,
    UserCredentials,
};

/// Persistence port for users and carbon entries
///
/// Point totals only ever change through atomic increments so concurrent
/// submissions for one user cannot lose an award.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. A duplicate email is a `StoreError::Conflict`
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<User>>;

    /// Add `delta` to a user's points, returning the new total or `None`
    /// when the user does not exist
    async fn increment_points(&self, user_id: Uuid, delta: i64) -> Result<Option<i64>>;

    /// Persist an entry and award `points` to its owner
    ///
    /// The entry is kept even when the owner is missing; then nothing is
    /// awarded and `total_points` is `None`.
    async fn record_entry(&self, entry: NewCarbonEntry, points: i64) -> Result<RecordedEntry>;

    /// Most recent entries for a user, newest first
    async fn recent_entries(&self, user_id: Uuid, limit: i64) -> Result<Vec<CarbonEntry>>;

    /// Entries dated strictly after `since`, newest first
    async fn entries_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<CarbonEntry>>;

    /// Every user with points and the sum of entry amounts dated after `since`
    async fn standings(&self, since: DateTime<Utc>) -> Result<Vec<Standing>>;

    async fn health_check(&self) -> Result<()>;
}
