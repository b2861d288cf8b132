//! Core environment trait and shared types.
//!
//! Every control environment implements the [`Environment`] trait so that the
//! rollout collector can drive episodes uniformly.

use serde::{Deserialize, Serialize};

/// The outcome of a single environment transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The state vector observed after the transition.
    pub state: Vec<f32>,
    /// The scalar reward for the transition.
    pub reward: f32,
    /// Whether the episode has ended (failure or step-limit truncation).
    pub done: bool,
    /// Arbitrary extra information from the environment.
    pub info: serde_json::Value,
}

/// The core environment trait.
///
/// The training loop is single-threaded and synchronous: each call fully
/// completes before the next one starts. Any fault raised here propagates
/// unchanged and aborts the run.
pub trait Environment {
    /// Reset the simulation and return the initial state vector.
    fn reset(&mut self) -> anyhow::Result<Vec<f32>>;

    /// Apply the discrete action with the given index and advance one tick.
    fn step(&mut self, action: usize) -> anyhow::Result<StepOutcome>;

    /// Length of the state vector.
    fn state_dim(&self) -> usize;

    /// Number of discrete actions.
    fn action_dim(&self) -> usize;

    /// The smoothed-reward level at which the task counts as solved.
    fn reward_threshold(&self) -> f32;
}
