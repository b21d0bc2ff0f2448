//! Handlers for dashboard preferences, saved dashboards and templates.
//!
//! Every endpoint requires authentication. Saving a custom dashboard also
//! requires the `dashboard.customize` capability.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use grantboard_core::error::CoreError;
use grantboard_core::filter::filter_widgets_by_capabilities;
use grantboard_core::generator::default_dashboard;
use grantboard_core::preferences::{UpdateDashboardPreferences, UserDashboardPreferences};
use grantboard_core::templates::{dashboard_template, templates_for};
use grantboard_core::widget::{validate_dashboard_config, DashboardConfig};
use grantboard_events::HookEvent;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCustomize;
use crate::response::DataResponse;
use crate::state::AppState;

pub const EVENT_PREFERENCES_UPDATED: &str = "dashboard.preferences.updated";
pub const EVENT_PREFERENCES_RESET: &str = "dashboard.preferences.reset";
pub const EVENT_CONFIG_SAVED: &str = "dashboard.config.saved";

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/dashboard/preferences
///
/// Returns the caller's stored preferences, or the defaults if none exist.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let prefs = state
        .store
        .find_preferences(auth.user_id)
        .await?
        .unwrap_or_else(|| UserDashboardPreferences::defaults(auth.user_id, Utc::now()));

    Ok(Json(DataResponse::ok(prefs)))
}

/// PUT /api/dashboard/preferences
///
/// Partial update; absent fields keep their stored values.
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateDashboardPreferences>,
) -> AppResult<impl IntoResponse> {
    input.check()?;

    let prefs = state.store.upsert_preferences(auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        dashboard_id = ?prefs.dashboard_id,
        "Dashboard preferences updated",
    );
    state.emit(
        HookEvent::new(EVENT_PREFERENCES_UPDATED)
            .with_actor(auth.user_id)
            .with_payload(json!({ "dashboardId": prefs.dashboard_id })),
    );

    Ok(Json(DataResponse::ok(prefs)))
}

/// DELETE /api/dashboard/preferences
///
/// Removes the caller's preferences. Idempotent; always 204.
pub async fn delete_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let existed = state.store.delete_preferences(auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, existed, "Dashboard preferences reset");
    state.emit(
        HookEvent::new(EVENT_PREFERENCES_RESET)
            .with_actor(auth.user_id)
            .with_payload(json!({ "existed": existed })),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Dashboard configs
// ---------------------------------------------------------------------------

/// GET /api/dashboard/config/{dashboard_id}
///
/// Template ids resolve to the catalog; anything else is looked up among the
/// caller's saved dashboards. The result is not filtered by capability.
pub async fn get_config(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(dashboard_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if let Some(template) = dashboard_template(&dashboard_id) {
        return Ok(Json(DataResponse::ok(template.config)));
    }

    let config = state
        .store
        .find_dashboard(auth.user_id, &dashboard_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DashboardConfig",
            id: dashboard_id,
        })?;

    Ok(Json(DataResponse::ok(config)))
}

/// PUT /api/dashboard/config/{dashboard_id}
///
/// Stores a custom dashboard for the caller. The body id must match the
/// path, and template ids are reserved.
pub async fn save_config(
    RequireCustomize(auth): RequireCustomize,
    State(state): State<AppState>,
    Path(dashboard_id): Path<String>,
    Json(input): Json<DashboardConfig>,
) -> AppResult<impl IntoResponse> {
    if input.id != dashboard_id {
        return Err(AppError::BadRequest(format!(
            "Body id '{}' does not match path id '{dashboard_id}'",
            input.id
        )));
    }
    if dashboard_template(&dashboard_id).is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "'{dashboard_id}' is a built-in template id"
        ))));
    }
    validate_dashboard_config(&input)?;

    let saved = state.store.save_dashboard(auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        dashboard_id = %saved.id,
        widgets = saved.widgets.len(),
        "Dashboard config saved",
    );
    state.emit(
        HookEvent::new(EVENT_CONFIG_SAVED)
            .with_actor(auth.user_id)
            .with_payload(json!({ "dashboardId": saved.id })),
    );

    Ok(Json(DataResponse::ok(saved)))
}

// ---------------------------------------------------------------------------
// Templates and defaults
// ---------------------------------------------------------------------------

/// GET /api/dashboard/templates
///
/// Templates whose required capabilities the caller holds.
pub async fn list_templates(auth: AuthUser) -> AppResult<impl IntoResponse> {
    let templates = templates_for(&auth.session.capabilities());
    Ok(Json(DataResponse::ok(templates)))
}

/// GET /api/dashboard/default
///
/// The role template or generated dashboard for the caller, filtered to the
/// widgets their capabilities allow.
pub async fn get_default(auth: AuthUser) -> AppResult<impl IntoResponse> {
    let mut config = default_dashboard(&auth.session)?;
    config.widgets = filter_widgets_by_capabilities(config.widgets, &auth.session.capabilities());

    tracing::debug!(
        user_id = auth.user_id,
        role = %auth.role,
        dashboard_id = %config.id,
        "Resolved default dashboard",
    );

    Ok(Json(DataResponse::ok(config)))
}
