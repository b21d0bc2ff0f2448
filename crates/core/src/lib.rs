//! Dashboard composition domain logic.
//!
//! Pure functions and types only; no I/O. Callers (the API server and the
//! dashboard client) pass all data in.
//!
//! - [`capability`] / [`session`] -- capability vocabulary and the resolver.
//! - [`templates`] -- curated templates and role defaults.
//! - [`generator`] -- capability-driven dashboard synthesis.
//! - [`filter`] -- capability re-check of assembled widget lists.
//! - [`layout`] -- grid packing shared by the generator and reflows.
//! - [`preferences`] -- per-user preference merge and application.

pub mod capability;
pub mod error;
pub mod filter;
pub mod generator;
pub mod layout;
pub mod preferences;
pub mod roles;
pub mod session;
pub mod templates;
pub mod types;
pub mod widget;
