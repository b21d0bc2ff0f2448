//! Capability-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose session does
//! not hold the required capability. Admin sessions hold every capability.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use grantboard_core::capability::Capability;
use grantboard_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `dashboard.customize` capability. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn save(RequireCustomize(user): RequireCustomize) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCustomize(pub AuthUser);

impl FromRequestParts<AppState> for RequireCustomize {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.session.has_capability(Capability::DashboardCustomize) {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "{} capability required",
                Capability::DashboardCustomize
            ))));
        }
        Ok(RequireCustomize(user))
    }
}
