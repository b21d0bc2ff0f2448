//! Repository for the `dashboard_preferences` table.

use std::collections::BTreeSet;

use grantboard_core::preferences::{
    Theme, UpdateDashboardPreferences, DEFAULT_REFRESH_INTERVAL_SECS,
};
use grantboard_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dashboard_preference::DashboardPreferenceRow;

/// Column list for `dashboard_preferences` queries.
const COLUMNS: &str = "user_id, dashboard_id, widget_order, hidden_widgets, custom_widgets, \
                       refresh_interval, theme, created_at, updated_at";

/// Per-user dashboard preference persistence.
pub struct DashboardPreferenceRepo;

impl DashboardPreferenceRepo {
    /// Find a user's preferences. Returns `None` if none were saved yet.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<DashboardPreferenceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboard_preferences WHERE user_id = $1");
        sqlx::query_as::<_, DashboardPreferenceRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update, creating the row from defaults if absent.
    ///
    /// `NULL` parameters leave the stored column untouched (`COALESCE`), so
    /// only the fields present in `patch` change.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        patch: &UpdateDashboardPreferences,
    ) -> Result<DashboardPreferenceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_preferences \
                 (user_id, dashboard_id, widget_order, hidden_widgets, custom_widgets, \
                  refresh_interval, theme) \
             VALUES ($1, $2, COALESCE($3, '[]'::jsonb), COALESCE($4, '[]'::jsonb), \
                     COALESCE($5, '[]'::jsonb), COALESCE($6, $8), COALESCE($7, $9)) \
             ON CONFLICT (user_id) DO UPDATE \
             SET dashboard_id = COALESCE($2, dashboard_preferences.dashboard_id), \
                 widget_order = COALESCE($3, dashboard_preferences.widget_order), \
                 hidden_widgets = COALESCE($4, dashboard_preferences.hidden_widgets), \
                 custom_widgets = COALESCE($5, dashboard_preferences.custom_widgets), \
                 refresh_interval = COALESCE($6, dashboard_preferences.refresh_interval), \
                 theme = COALESCE($7, dashboard_preferences.theme), \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let hidden = patch
            .hidden_widgets
            .as_ref()
            .map(|h| Json(h.iter().cloned().collect::<BTreeSet<String>>()));

        sqlx::query_as::<_, DashboardPreferenceRow>(&query)
            .bind(user_id)
            .bind(patch.dashboard_id.as_deref())
            .bind(patch.widget_order.as_ref().map(Json))
            .bind(hidden)
            .bind(patch.custom_widgets.as_ref().map(Json))
            .bind(patch.refresh_interval)
            .bind(patch.theme.map(Theme::as_str))
            .bind(DEFAULT_REFRESH_INTERVAL_SECS)
            .bind(Theme::default().as_str())
            .fetch_one(pool)
            .await
    }

    /// Delete a user's preferences. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dashboard_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
