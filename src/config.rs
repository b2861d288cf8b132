use serde::{Deserialize, Serialize};

/// Complete configuration for a training run.
///
/// The defaults are known-good settings for the cart-pole task; a JSON file
/// passed via `--config` can override any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeterConfig {
    pub a2c: A2cConfig,
    pub ppo: PpoConfig,
    pub run: LoopConfig,
}

/// Hyperparameters for the A2C update rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2cConfig {
    /// Rollout step budget per episode (default: 1000).
    pub sample_nums: usize,
    /// Discount factor applied to future rewards (default: 0.99).
    pub gamma: f32,
    /// Actor learning rate (default: 1e-2).
    pub actor_lr: f64,
    /// Critic learning rate (default: 1e-2).
    pub critic_lr: f64,
    /// Hidden layer width for both networks (default: 64).
    pub hidden_size: usize,
}

/// Hyperparameters for the PPO update rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpoConfig {
    /// Rollout step budget per episode (default: 300).
    pub sample_nums: usize,
    /// Discount factor applied to future rewards (default: 0.99).
    pub gamma: f32,
    /// Actor learning rate (default: 1e-3).
    pub actor_lr: f64,
    /// Critic learning rate (default: 1e-3).
    pub critic_lr: f64,
    /// Hidden layer width for both networks (default: 64).
    pub hidden_size: usize,
    /// Importance-ratio clipping bound epsilon (default: 0.2).
    pub clip_param: f32,
    /// Target networks are re-synchronized every this many episodes
    /// (default: 10).
    pub target_update_step: usize,
}

/// Configuration for the episode loop and final evaluation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Initial value of the smoothed running reward (default: 10.0).
    pub running_reward_init: f64,
    /// Exponential smoothing factor for the running reward (default: 0.99).
    pub running_reward_decay: f64,
    /// A progress line is emitted every this many episodes (default: 50).
    pub log_interval: usize,
    /// Number of greedy evaluation episodes once solved (default: 10).
    pub eval_episodes: usize,
    /// Per-episode step cap during evaluation (default: 1000).
    pub eval_step_cap: usize,
    /// Optional safety cap on training episodes. `None` trains until the
    /// running reward clears the environment's solve threshold, however long
    /// that takes (default: None).
    pub max_episodes: Option<usize>,
}

impl Default for TeeterConfig {
    fn default() -> Self {
        Self {
            a2c: A2cConfig {
                sample_nums: 1000,
                gamma: 0.99,
                actor_lr: 1e-2,
                critic_lr: 1e-2,
                hidden_size: 64,
            },
            ppo: PpoConfig {
                sample_nums: 300,
                gamma: 0.99,
                actor_lr: 1e-3,
                critic_lr: 1e-3,
                hidden_size: 64,
                clip_param: 0.2,
                target_update_step: 10,
            },
            run: LoopConfig {
                running_reward_init: 10.0,
                running_reward_decay: 0.99,
                log_interval: 50,
                eval_episodes: 10,
                eval_step_cap: 1000,
                max_episodes: None,
            },
        }
    }
}
