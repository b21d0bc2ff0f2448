use std::sync::Arc;

use grantboard_db::DashboardStore;
use grantboard_events::{EventHooks, HookEvent};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Preference and saved-dashboard persistence.
    pub store: Arc<dyn DashboardStore>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Event hook queue for dashboard lifecycle events.
    pub hooks: Arc<EventHooks>,
}

impl AppState {
    /// Queue a hook event. A full or stopped queue is logged, never surfaced
    /// to the caller.
    pub fn emit(&self, event: HookEvent) {
        let event_type = event.event_type.clone();
        if let Err(e) = self.hooks.emit(event) {
            tracing::warn!(event_type = %event_type, error = %e, "Dropped hook event");
        }
    }
}
