//! The episode loop: rollout, update, solved detection, evaluation.
//!
//! [`TrainerSession`] owns everything the loop touches -- the environment,
//! the agent (which owns the networks and optimizers), the sampling RNG --
//! as explicit fields rather than globals. One session runs one training
//! phase followed by one evaluation phase:
//!
//! ```text
//! Training:   repeat  rollout -> discount -> update -> smooth running reward
//!             until   running_reward > env.reward_threshold()   (Solved)
//! Evaluating: a fixed number of greedy episodes with the final policy,
//!             observing but not training, then the session reports and
//!             returns.
//! ```
//!
//! The training phase is unbounded by default; `LoopConfig.max_episodes`
//! offers an opt-in safety cap for environments that never improve.

use anyhow::{Context, Result};
use burn::tensor::{
    backend::{AutodiffBackend, Backend},
    ElementConversion, Tensor, TensorData,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};

use crate::config::LoopConfig;
use crate::env::Environment;
use crate::model::PolicyNet;
use crate::trajectory::roll_out;

use super::agent::PolicyGradient;

// ---------------------------------------------------------------------------
// Training report
// ---------------------------------------------------------------------------

/// What a finished session hands back to the caller.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Number of training episodes run.
    pub episodes: usize,
    /// Final value of the smoothed running reward.
    pub running_reward: f64,
    /// Whether the running reward cleared the environment's threshold.
    pub solved: bool,
    /// Length of each greedy evaluation episode (empty if never solved).
    pub eval_lengths: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Trainer session
// ---------------------------------------------------------------------------

/// Owns one complete training run: environment, agent, RNG, and loop
/// configuration.
pub struct TrainerSession<B, A, E>
where
    B: AutodiffBackend,
    A: PolicyGradient<B>,
    E: Environment,
{
    env: E,
    agent: A,
    config: LoopConfig,
    rng: StdRng,
    device: B::Device,
}

impl<B, A, E> TrainerSession<B, A, E>
where
    B: AutodiffBackend,
    A: PolicyGradient<B>,
    E: Environment,
{
    /// Create a session. A `seed` makes action sampling reproducible;
    /// without one the RNG is entropy-seeded.
    pub fn new(env: E, agent: A, config: LoopConfig, seed: Option<u64>, device: B::Device) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            env,
            agent,
            config,
            rng,
            device,
        }
    }

    /// Train until solved (or the optional episode cap), then evaluate.
    pub fn run(&mut self) -> Result<TrainingReport> {
        let threshold = f64::from(self.env.reward_threshold());
        let budget = self.agent.rollout_budget();
        info!(threshold, budget, "training started");

        let mut running_reward = self.config.running_reward_init;
        let mut episodes = 0;
        let mut solved = false;

        for episode in 1usize.. {
            episodes = episode;

            let rollout = roll_out(
                &mut self.env,
                self.agent.policy(),
                self.agent.value(),
                budget,
                &mut self.rng,
                &self.device,
            )?;
            let last_length = rollout.len();
            let steps = rollout.steps;

            let stats = self.agent.update(&rollout)?;
            running_reward =
                smooth_running_reward(running_reward, steps, self.config.running_reward_decay);

            if episode % self.config.log_interval == 0 {
                info!(
                    episode,
                    last_length,
                    running_reward,
                    actor_loss = stats.actor_loss,
                    critic_loss = stats.critic_loss,
                    "progress"
                );
            }

            if running_reward > threshold {
                info!(
                    episode,
                    running_reward, last_length, "solved; running reward cleared the threshold"
                );
                solved = true;
                break;
            }

            if let Some(cap) = self.config.max_episodes {
                if episode >= cap {
                    warn!(cap, running_reward, "episode cap reached before solving");
                    break;
                }
            }

            self.agent.end_episode(episode);
        }

        let eval_lengths = if solved { self.evaluate()? } else { Vec::new() };

        Ok(TrainingReport {
            episodes,
            running_reward,
            solved,
            eval_lengths,
        })
    }

    /// Run the fixed greedy evaluation phase with the final policy.
    ///
    /// Each episode picks the argmax action (no sampling, no updates) and
    /// stops at environment completion or the step cap.
    fn evaluate(&mut self) -> Result<Vec<usize>> {
        let mut lengths = Vec::with_capacity(self.config.eval_episodes);

        for episode in 1..=self.config.eval_episodes {
            let mut state = self.env.reset().context("environment reset failed")?;
            let mut length = self.config.eval_step_cap;

            for t in 0..self.config.eval_step_cap {
                let action = greedy_action::<B>(self.agent.policy(), &state, &self.device);
                let outcome = self.env.step(action).context("environment step failed")?;
                state = outcome.state;
                if outcome.done {
                    length = t + 1;
                    info!(episode, timesteps = length, "evaluation episode finished");
                    break;
                }
            }

            lengths.push(length);
        }

        Ok(lengths)
    }
}

/// One exponential-smoothing step of the running reward.
fn smooth_running_reward(previous: f64, steps: usize, decay: f64) -> f64 {
    previous * decay + steps as f64 * (1.0 - decay)
}

/// The argmax action under the policy for a single state.
fn greedy_action<B: Backend>(policy: &PolicyNet<B>, state: &[f32], device: &B::Device) -> usize {
    let input = Tensor::from_data(TensorData::new(state.to_vec(), [1, state.len()]), device);
    let action: i64 = policy.forward(input).argmax(1).into_scalar().elem();
    action as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
