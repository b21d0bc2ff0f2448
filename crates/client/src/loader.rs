//! Dashboard load/save orchestration for one session.
//!
//! [`DashboardLoader::load`] never fails: any fetch or assembly error is
//! logged and the session's default dashboard is used instead. Saves and
//! resets surface their errors to the caller.

use grantboard_core::filter::filter_widgets_by_capabilities;
use grantboard_core::generator::default_dashboard;
use grantboard_core::preferences::{
    apply_preferences, UpdateDashboardPreferences, UserDashboardPreferences,
};
use grantboard_core::session::SessionState;
use grantboard_core::widget::{DashboardConfig, DashboardLayout, GRID_COLUMNS};

use crate::api::ClientError;
use crate::source::DashboardSource;

/// Loads, customizes and filters the dashboard for one session.
///
/// Methods take `&mut self`, so loads on one loader never interleave.
pub struct DashboardLoader<S> {
    source: S,
    session: SessionState,
    preferences: Option<UserDashboardPreferences>,
}

impl<S: DashboardSource> DashboardLoader<S> {
    pub fn new(source: S, session: SessionState) -> Self {
        Self {
            source,
            session,
            preferences: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Preferences from the last successful fetch or save.
    pub fn preferences(&self) -> Option<&UserDashboardPreferences> {
        self.preferences.as_ref()
    }

    /// Fetch preferences and assemble the dashboard.
    ///
    /// A failed preference fetch leaves the cache untouched and yields the
    /// default dashboard without customization.
    pub async fn load(&mut self) -> DashboardConfig {
        if self.session.user().is_none() {
            return self.assemble(None).await;
        }

        match self.source.fetch_preferences().await {
            Ok(prefs) => {
                self.preferences = Some(prefs.clone());
                self.assemble(Some(&prefs)).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load dashboard preferences, using default");
                self.assemble(None).await
            }
        }
    }

    /// Store `patch`, cache the result and reload.
    pub async fn save(
        &mut self,
        patch: &UpdateDashboardPreferences,
    ) -> Result<DashboardConfig, ClientError> {
        let prefs = self.source.update_preferences(patch).await?;
        tracing::debug!(dashboard_id = ?prefs.dashboard_id, "Dashboard preferences saved");
        self.preferences = Some(prefs);
        Ok(self.load().await)
    }

    /// Delete stored preferences, clear the cache and reload.
    pub async fn reset(&mut self) -> Result<DashboardConfig, ClientError> {
        self.source.reset_preferences().await?;
        self.preferences = None;
        tracing::debug!("Dashboard preferences reset");
        Ok(self.load().await)
    }

    async fn assemble(&self, prefs: Option<&UserDashboardPreferences>) -> DashboardConfig {
        let base = match prefs.and_then(|p| p.dashboard_id.as_deref()) {
            Some(dashboard_id) => match self.source.fetch_config(dashboard_id).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(
                        dashboard_id,
                        error = %e,
                        "Failed to load saved dashboard, using default",
                    );
                    self.fallback()
                }
            },
            None => self.fallback(),
        };

        let customized = match prefs {
            Some(prefs) => match apply_preferences(base.clone(), prefs) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to apply dashboard preferences");
                    base
                }
            },
            None => base,
        };

        let capabilities = self.session.capabilities();
        DashboardConfig {
            widgets: filter_widgets_by_capabilities(customized.widgets, &capabilities),
            ..customized
        }
    }

    /// Role template or generated dashboard for the session.
    fn fallback(&self) -> DashboardConfig {
        default_dashboard(&self.session).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build default dashboard");
            empty_dashboard()
        })
    }
}

fn empty_dashboard() -> DashboardConfig {
    DashboardConfig {
        id: "empty".to_string(),
        name: "Dashboard".to_string(),
        description: None,
        layout: DashboardLayout::Grid,
        columns: GRID_COLUMNS,
        widgets: Vec::new(),
        is_default: true,
        is_customizable: false,
    }
}
