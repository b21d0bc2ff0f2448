//! Route definitions for dashboard preferences, configs and templates.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboard`.
///
/// ```text
/// GET    /preferences                -> get_preferences
/// PUT    /preferences                -> update_preferences
/// DELETE /preferences                -> delete_preferences
/// GET    /config/{dashboard_id}      -> get_config
/// PUT    /config/{dashboard_id}      -> save_config
/// GET    /templates                  -> list_templates
/// GET    /default                    -> get_default
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/preferences",
            get(dashboard::get_preferences)
                .put(dashboard::update_preferences)
                .delete(dashboard::delete_preferences),
        )
        .route(
            "/config/{dashboard_id}",
            get(dashboard::get_config).put(dashboard::save_config),
        )
        .route("/templates", get(dashboard::list_templates))
        .route("/default", get(dashboard::get_default))
}
