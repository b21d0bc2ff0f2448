//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Builds the caller's session from a JWT Bearer token.
//! - [`rbac::RequireCustomize`] -- Requires the `dashboard.customize` capability.

pub mod auth;
pub mod rbac;
