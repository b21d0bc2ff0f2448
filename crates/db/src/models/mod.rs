//! Row types for the dashboard tables.

pub mod dashboard_preference;
pub mod saved_dashboard;
