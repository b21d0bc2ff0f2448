//! Well-known role name constants.
//!
//! Roles are free-form strings carried in the access token. Only the names
//! below have a curated dashboard template; see
//! [`templates::default_dashboard_for_role`](crate::templates::default_dashboard_for_role).

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EXECUTIVE: &str = "executive";
pub const ROLE_GRANTS_MANAGER: &str = "grants_manager";
pub const ROLE_PROGRAM_MANAGER: &str = "program_manager";
pub const ROLE_OPERATIONS: &str = "operations";
pub const ROLE_FINANCE_OFFICER: &str = "finance_officer";
pub const ROLE_PARTNER: &str = "partner";
