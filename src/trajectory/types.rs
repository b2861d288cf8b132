//! Core trajectory data types.
//!
//! A [`Rollout`] captures everything one update step needs to know about an
//! episode of agent-environment interaction. It is owned by a single rollout
//! invocation and dropped after the update that consumes it; nothing here is
//! persisted.

use burn::tensor::{backend::Backend, Int, Tensor, TensorData};

// ---------------------------------------------------------------------------
// Sampled action
// ---------------------------------------------------------------------------

/// A categorical action together with its sampling context.
///
/// The log-probability is recorded at sampling time so the trajectory is
/// self-contained; the update paths recompute log-probabilities from `index`
/// against whichever policy they need (live or target).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledAction {
    /// Index of the chosen action in `[0, action_dim)`.
    pub index: usize,
    /// Log-probability of the action under the policy that sampled it.
    pub log_prob: f32,
}

// ---------------------------------------------------------------------------
// Rollout
// ---------------------------------------------------------------------------

/// One bounded trajectory collected by following the current policy.
///
/// The state, action, and reward sequences are parallel and always equal in
/// length; each position is one environment transition.
#[derive(Debug, Clone)]
pub struct Rollout {
    /// State observed before each transition.
    pub states: Vec<Vec<f32>>,
    /// Action taken at each transition.
    pub actions: Vec<SampledAction>,
    /// Reward received for each transition.
    pub rewards: Vec<f32>,
    /// Step count as reported to the running-reward tracker. Equal to the
    /// trajectory length when the environment ended the episode; when the
    /// step budget ran out instead, this is the final loop index
    /// (`length - 1`).
    pub steps: usize,
    /// Continuation value for a budget-truncated trajectory: the value
    /// network's estimate at the final reached state, or exactly 0.0 when
    /// the episode genuinely ended.
    pub bootstrap: f32,
}

impl Rollout {
    /// Number of transitions recorded.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the rollout recorded no transitions at all.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Length of the state vectors.
    pub fn state_dim(&self) -> usize {
        self.states.first().map_or(0, Vec::len)
    }

    /// Batch all states into a `[len, state_dim]` tensor.
    pub fn states_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let flat: Vec<f32> = self.states.iter().flatten().copied().collect();
        Tensor::from_data(TensorData::new(flat, [self.len(), self.state_dim()]), device)
    }

    /// Action indices as a `[len, 1]` integer column, ready for `gather`.
    pub fn action_indices<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2, Int> {
        let indices: Vec<i32> = self.actions.iter().map(|a| a.index as i32).collect();
        Tensor::from_data(TensorData::new(indices, [self.len(), 1]), device)
    }

    /// One-hot encode the taken actions into a `[len, action_dim]` tensor.
    pub fn one_hot_actions<B: Backend>(
        &self,
        action_dim: usize,
        device: &B::Device,
    ) -> Tensor<B, 2> {
        let mut flat = vec![0.0f32; self.len() * action_dim];
        for (row, action) in self.actions.iter().enumerate() {
            flat[row * action_dim + action.index] = 1.0;
        }
        Tensor::from_data(TensorData::new(flat, [self.len(), action_dim]), device)
    }
}
