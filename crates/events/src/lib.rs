//! In-process event hooks.
//!
//! - [`EventHooks`] -- bounded queue drained by a single consumer task that
//!   runs subscribed handlers in FIFO order, with explicit start/stop.
//! - [`HookEvent`] -- the event envelope.

pub mod hooks;

pub use hooks::{EventHooks, HookError, HookEvent, HookId, WILDCARD};
