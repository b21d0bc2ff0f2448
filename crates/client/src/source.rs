use async_trait::async_trait;
use grantboard_core::preferences::{UpdateDashboardPreferences, UserDashboardPreferences};
use grantboard_core::widget::DashboardConfig;

use crate::api::{ClientError, DashboardApi};

/// Where a [`DashboardLoader`](crate::loader::DashboardLoader) reads and
/// writes preferences and saved dashboards.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_preferences(&self) -> Result<UserDashboardPreferences, ClientError>;

    async fn fetch_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ClientError>;

    async fn update_preferences(
        &self,
        patch: &UpdateDashboardPreferences,
    ) -> Result<UserDashboardPreferences, ClientError>;

    async fn reset_preferences(&self) -> Result<(), ClientError>;
}

#[async_trait]
impl DashboardSource for DashboardApi {
    async fn fetch_preferences(&self) -> Result<UserDashboardPreferences, ClientError> {
        self.get_preferences().await
    }

    async fn fetch_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ClientError> {
        self.get_config(dashboard_id).await
    }

    async fn update_preferences(
        &self,
        patch: &UpdateDashboardPreferences,
    ) -> Result<UserDashboardPreferences, ClientError> {
        DashboardApi::update_preferences(self, patch).await
    }

    async fn reset_preferences(&self) -> Result<(), ClientError> {
        DashboardApi::reset_preferences(self).await
    }
}
