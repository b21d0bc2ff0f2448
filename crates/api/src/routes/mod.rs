pub mod dashboard;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /dashboard/preferences                 get, update, reset
/// /dashboard/config/{dashboard_id}       get, save
/// /dashboard/templates                   list
/// /dashboard/default                     role or generated default
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/dashboard", dashboard::router())
}
