use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::errors::{Result, StoreError};
use crate::db::store::Store;
use crate::models::{
    CarbonEntry, NewCarbonEntry, NewUser, ProfileUpdate, RecordedEntry, Standing, User,
    UserCredentials,
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserCredentials>,
    /// Insertion order
    entries: Vec<CarbonEntry>,
}

impl State {
    /// Overflow is an error and leaves the total untouched, matching the
    /// BIGINT overflow the Postgres store reports
    fn add_points(&mut self, user_id: Uuid, delta: i64) -> Result<Option<i64>> {
        let Some(stored) = self.users.get_mut(&user_id) else {
            return Ok(None);
        };
        stored.user.points = stored
            .user
            .points
            .checked_add(delta)
            .ok_or_else(|| StoreError::InvalidData(format!("point total out of range for {}", user_id)))?;
        Ok(Some(stored.user.points))
    }

    /// Newest first; later insertions win ties on `date`
    fn entries_for(&self, user_id: Uuid) -> Vec<&CarbonEntry> {
        let mut entries: Vec<&CarbonEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }
}

/// In-process store used for tests and database-less local runs
///
/// Every mutation happens under one write lock, which makes each award
/// atomic with respect to other writers.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.user.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            points: 0,
            avatar_url: None,
            created_at: Utc::now(),
        };
        state.users.insert(created.id, UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash,
        });

        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.user.email == email).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|u| u.user.clone()))
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|stored| {
            if let Some(name) = update.name {
                stored.user.name = name;
            }
            if let Some(avatar_url) = update.avatar_url {
                stored.user.avatar_url = Some(avatar_url);
            }
            stored.user.clone()
        }))
    }

    async fn increment_points(&self, user_id: Uuid, delta: i64) -> Result<Option<i64>> {
        let mut state = self.state.write().await;
        state.add_points(user_id, delta)
    }

    async fn record_entry(&self, entry: NewCarbonEntry, points: i64) -> Result<RecordedEntry> {
        let mut state = self.state.write().await;

        let entry = entry.into_entry(Uuid::new_v4());
        // Award first so a failed award stores nothing
        let total_points = state.add_points(entry.user_id, points)?;
        state.entries.push(entry.clone());

        Ok(RecordedEntry {
            entry,
            points_awarded: if total_points.is_some() { points } else { 0 },
            total_points,
        })
    }

    async fn recent_entries(&self, user_id: Uuid, limit: i64) -> Result<Vec<CarbonEntry>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(state
            .entries_for(user_id)
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn entries_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<CarbonEntry>> {
        let state = self.state.read().await;
        Ok(state
            .entries_for(user_id)
            .into_iter()
            .filter(|e| e.date > since)
            .cloned()
            .collect())
    }

    async fn standings(&self, since: DateTime<Utc>) -> Result<Vec<Standing>> {
        let state = self.state.read().await;

        let mut footprints: HashMap<Uuid, Decimal> = HashMap::new();
        for entry in state.entries.iter().filter(|e| e.date > since) {
            let total = footprints.entry(entry.user_id).or_default();
            *total = total.checked_add(entry.amount).ok_or_else(|| {
                StoreError::InvalidData(format!("footprint out of range for {}", entry.user_id))
            })?;
        }

        let mut standings: Vec<Standing> = state
            .users
            .values()
            .map(|u| Standing {
                user_id: u.user.id,
                name: u.user.name.clone(),
                points: u.user.points,
                footprint: footprints.get(&u.user.id).copied().unwrap_or_default(),
            })
            .collect();
        standings.sort_by_key(|s| s.user_id);

        Ok(standings)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
