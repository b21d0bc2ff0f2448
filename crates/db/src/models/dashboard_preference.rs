//! Dashboard preference entity model.

use std::collections::BTreeSet;

use grantboard_core::preferences::{Theme, UserDashboardPreferences};
use grantboard_core::types::{DbId, Timestamp};
use grantboard_core::widget::WidgetConfig;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `dashboard_preferences` table.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardPreferenceRow {
    pub user_id: DbId,
    pub dashboard_id: Option<String>,
    pub widget_order: Json<Vec<String>>,
    pub hidden_widgets: Json<BTreeSet<String>>,
    pub custom_widgets: Json<Vec<WidgetConfig>>,
    pub refresh_interval: i32,
    pub theme: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DashboardPreferenceRow> for UserDashboardPreferences {
    fn from(row: DashboardPreferenceRow) -> Self {
        Self {
            user_id: row.user_id,
            dashboard_id: row.dashboard_id,
            widget_order: row.widget_order.0,
            hidden_widgets: row.hidden_widgets.0,
            custom_widgets: row.custom_widgets.0,
            refresh_interval: row.refresh_interval,
            // The table's CHECK constraint keeps this in range.
            theme: Theme::from_name(&row.theme).unwrap_or_default(),
            updated_at: row.updated_at,
        }
    }
}
