//! Repository for the `dashboard_configs` table.

use grantboard_core::types::DbId;
use grantboard_core::widget::DashboardConfig;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::saved_dashboard::SavedDashboardRow;

/// Column list for `dashboard_configs` queries.
const COLUMNS: &str = "user_id, dashboard_id, config, created_at, updated_at";

/// User-saved dashboard persistence.
pub struct SavedDashboardRepo;

impl SavedDashboardRepo {
    /// Find one of a user's saved dashboards by id.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        dashboard_id: &str,
    ) -> Result<Option<SavedDashboardRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dashboard_configs WHERE user_id = $1 AND dashboard_id = $2"
        );
        sqlx::query_as::<_, SavedDashboardRow>(&query)
            .bind(user_id)
            .bind(dashboard_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace a saved dashboard, keyed by `config.id`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        config: &DashboardConfig,
    ) -> Result<SavedDashboardRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_configs (user_id, dashboard_id, config) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, dashboard_id) DO UPDATE \
             SET config = EXCLUDED.config, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedDashboardRow>(&query)
            .bind(user_id)
            .bind(&config.id)
            .bind(Json(config))
            .fetch_one(pool)
            .await
    }
}
