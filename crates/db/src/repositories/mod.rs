//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_preference_repo;
pub mod saved_dashboard_repo;

pub use dashboard_preference_repo::DashboardPreferenceRepo;
pub use saved_dashboard_repo::SavedDashboardRepo;
