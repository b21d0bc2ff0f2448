//! User-saved dashboard entity model.

use grantboard_core::types::{DbId, Timestamp};
use grantboard_core::widget::DashboardConfig;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `dashboard_configs` table.
#[derive(Debug, Clone, FromRow)]
pub struct SavedDashboardRow {
    pub user_id: DbId,
    pub dashboard_id: String,
    pub config: Json<DashboardConfig>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
