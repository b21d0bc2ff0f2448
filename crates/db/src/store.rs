//! Storage abstraction used by the API handlers.
//!
//! [`PgDashboardStore`] is the production implementation over the
//! repositories. [`MemoryDashboardStore`] keeps everything in process and is
//! used for local development without a database and in integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use grantboard_core::preferences::{
    merge_preferences, UpdateDashboardPreferences, UserDashboardPreferences,
};
use grantboard_core::types::DbId;
use grantboard_core::widget::DashboardConfig;
use tokio::sync::RwLock;

use crate::repositories::{DashboardPreferenceRepo, SavedDashboardRepo};
use crate::DbPool;

/// Persistence operations for dashboard preferences and saved dashboards.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;

    async fn find_preferences(
        &self,
        user_id: DbId,
    ) -> Result<Option<UserDashboardPreferences>, sqlx::Error>;

    /// Merge `patch` into the stored preferences (creating them if absent).
    async fn upsert_preferences(
        &self,
        user_id: DbId,
        patch: &UpdateDashboardPreferences,
    ) -> Result<UserDashboardPreferences, sqlx::Error>;

    /// Returns `true` if preferences existed and were removed.
    async fn delete_preferences(&self, user_id: DbId) -> Result<bool, sqlx::Error>;

    async fn find_dashboard(
        &self,
        user_id: DbId,
        dashboard_id: &str,
    ) -> Result<Option<DashboardConfig>, sqlx::Error>;

    async fn save_dashboard(
        &self,
        user_id: DbId,
        config: &DashboardConfig,
    ) -> Result<DashboardConfig, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`DashboardStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgDashboardStore {
    pool: DbPool,
}

impl PgDashboardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardStore for PgDashboardStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn find_preferences(
        &self,
        user_id: DbId,
    ) -> Result<Option<UserDashboardPreferences>, sqlx::Error> {
        let row = DashboardPreferenceRepo::find_by_user(&self.pool, user_id).await?;
        Ok(row.map(Into::into))
    }

    async fn upsert_preferences(
        &self,
        user_id: DbId,
        patch: &UpdateDashboardPreferences,
    ) -> Result<UserDashboardPreferences, sqlx::Error> {
        let row = DashboardPreferenceRepo::upsert(&self.pool, user_id, patch).await?;
        Ok(row.into())
    }

    async fn delete_preferences(&self, user_id: DbId) -> Result<bool, sqlx::Error> {
        DashboardPreferenceRepo::delete(&self.pool, user_id).await
    }

    async fn find_dashboard(
        &self,
        user_id: DbId,
        dashboard_id: &str,
    ) -> Result<Option<DashboardConfig>, sqlx::Error> {
        let row = SavedDashboardRepo::find(&self.pool, user_id, dashboard_id).await?;
        Ok(row.map(|r| r.config.0))
    }

    async fn save_dashboard(
        &self,
        user_id: DbId,
        config: &DashboardConfig,
    ) -> Result<DashboardConfig, sqlx::Error> {
        let row = SavedDashboardRepo::upsert(&self.pool, user_id, config).await?;
        Ok(row.config.0)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// [`DashboardStore`] held entirely in process memory. Never fails.
#[derive(Default)]
pub struct MemoryDashboardStore {
    preferences: RwLock<HashMap<DbId, UserDashboardPreferences>>,
    dashboards: RwLock<HashMap<(DbId, String), DashboardConfig>>,
}

impl MemoryDashboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DashboardStore for MemoryDashboardStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn find_preferences(
        &self,
        user_id: DbId,
    ) -> Result<Option<UserDashboardPreferences>, sqlx::Error> {
        Ok(self.preferences.read().await.get(&user_id).cloned())
    }

    async fn upsert_preferences(
        &self,
        user_id: DbId,
        patch: &UpdateDashboardPreferences,
    ) -> Result<UserDashboardPreferences, sqlx::Error> {
        let mut map = self.preferences.write().await;
        let merged = merge_preferences(map.remove(&user_id), user_id, patch, chrono::Utc::now());
        map.insert(user_id, merged.clone());
        Ok(merged)
    }

    async fn delete_preferences(&self, user_id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.preferences.write().await.remove(&user_id).is_some())
    }

    async fn find_dashboard(
        &self,
        user_id: DbId,
        dashboard_id: &str,
    ) -> Result<Option<DashboardConfig>, sqlx::Error> {
        let key = (user_id, dashboard_id.to_string());
        Ok(self.dashboards.read().await.get(&key).cloned())
    }

    async fn save_dashboard(
        &self,
        user_id: DbId,
        config: &DashboardConfig,
    ) -> Result<DashboardConfig, sqlx::Error> {
        self.dashboards
            .write()
            .await
            .insert((user_id, config.id.clone()), config.clone());
        Ok(config.clone())
    }
}
