//! Dashboard orchestration for Skycast.
//!
//! Ties location lookup, weather fetches, forecast aggregation and the
//! favorites store together behind one controller that owns the
//! transient view state.

pub mod controller;
pub mod error;
mod error_mapping;
pub mod render;

pub use controller::{DashboardController, DashboardState, ToggleOutcome};
pub use error::DashboardError;
