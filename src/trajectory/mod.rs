//! Trajectory types and rollout collection.
//!
//! This module provides:
//! - [`types::SampledAction`], [`types::Rollout`] -- the data captured during
//!   one episode of agent-environment interaction.
//! - [`collector::roll_out`] -- the loop that drives the environment with the
//!   live policy and records the trajectory.

pub mod collector;
pub mod types;

// Re-export the most commonly used items at the module level.
pub use collector::roll_out;
pub use types::{Rollout, SampledAction};
