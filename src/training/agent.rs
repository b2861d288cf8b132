//! The capability interface the episode loop needs from an algorithm.
//!
//! A2C and PPO both expose the same surface: the live networks the rollout
//! collector reads, one gradient update per rollout, and an end-of-episode
//! hook (PPO uses it for target-network synchronization; A2C has nothing to
//! do there).

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;

use crate::model::{PolicyNet, ValueNet};
use crate::trajectory::Rollout;

/// Diagnostics from a single gradient update.
#[derive(Debug, Clone)]
pub struct UpdateStats {
    /// Scalar actor loss after this update's forward pass.
    pub actor_loss: f32,
    /// Scalar critic loss after this update's forward pass.
    pub critic_loss: f32,
    /// Mean importance ratio across the batch (PPO only).
    pub mean_ratio: Option<f32>,
    /// Fraction of ratios clipped by the epsilon bound (PPO only).
    pub clip_fraction: Option<f32>,
}

/// A policy-gradient algorithm driving an actor-critic pair.
pub trait PolicyGradient<B: AutodiffBackend> {
    /// The live policy network, used for rollouts and evaluation.
    fn policy(&self) -> &PolicyNet<B>;

    /// The live value network, used for rollout bootstrapping.
    fn value(&self) -> &ValueNet<B>;

    /// The rollout step budget this algorithm trains with.
    fn rollout_budget(&self) -> usize;

    /// Consume one rollout: compute losses and apply one gradient step to
    /// each network.
    fn update(&mut self, rollout: &Rollout) -> Result<UpdateStats>;

    /// Called after each training episode (post update and solved check).
    fn end_episode(&mut self, episode: usize);
}
