//! Client side of the dashboard API.
//!
//! - [`api`] -- reqwest client for the REST endpoints.
//! - [`source`] -- the [`DashboardSource`] seam the loader reads through.
//! - [`loader`] -- load/save/reset orchestration with graceful fallback.
//! - [`render`] -- component-table resolution for rendering.

pub mod api;
pub mod config;
pub mod loader;
pub mod render;
pub mod source;

pub use api::{ClientError, DashboardApi, TemplateInfo};
pub use config::ClientConfig;
pub use loader::DashboardLoader;
pub use render::{resolve_render_plan, RenderItem};
pub use source::DashboardSource;
