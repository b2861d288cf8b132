//! Rollout collection: driving the environment with the live policy.
//!
//! [`roll_out`] runs one bounded episode by repeatedly:
//!   1. recording the current state,
//!   2. sampling an action from the policy's categorical distribution,
//!   3. stepping the environment,
//!   4. recording the reward.
//!
//! The loop stops the moment the environment reports completion, or when the
//! step budget runs out; in the latter case the value network supplies a
//! bootstrap estimate for the unreached remainder of the episode.

use anyhow::{anyhow, Context, Result};
use burn::tensor::{activation, backend::Backend, ElementConversion, Tensor, TensorData};
use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs::StdRng,
};
use tracing::debug;

use crate::env::Environment;
use crate::model::{PolicyNet, ValueNet};

use super::types::{Rollout, SampledAction};

/// Collect one trajectory of at most `max_steps` transitions.
///
/// Actions are sampled proportionally to the policy's output probabilities,
/// never greedily. Any environment fault propagates unchanged; the caller
/// aborts the run.
pub fn roll_out<B, E>(
    env: &mut E,
    policy: &PolicyNet<B>,
    value: &ValueNet<B>,
    max_steps: usize,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<Rollout>
where
    B: Backend,
    E: Environment,
{
    let mut state = env.reset().context("environment reset failed")?;

    let mut states: Vec<Vec<f32>> = Vec::new();
    let mut actions: Vec<SampledAction> = Vec::new();
    let mut rewards: Vec<f32> = Vec::new();
    let mut done = false;

    for _ in 0..max_steps {
        states.push(state.clone());

        let logits = policy.forward(single_state_tensor::<B>(&state, device));
        let probs: Vec<f32> = activation::softmax(logits.clone(), 1)
            .into_data()
            .to_vec()
            .map_err(|e| anyhow!("failed to read action probabilities: {e:?}"))?;
        let log_probs: Vec<f32> = activation::log_softmax(logits, 1)
            .into_data()
            .to_vec()
            .map_err(|e| anyhow!("failed to read action log-probabilities: {e:?}"))?;

        let action = WeightedIndex::new(&probs)
            .context("policy produced a degenerate action distribution")?
            .sample(rng);

        let outcome = env.step(action).context("environment step failed")?;

        actions.push(SampledAction {
            index: action,
            log_prob: log_probs[action],
        });
        rewards.push(outcome.reward);
        state = outcome.state;

        if outcome.done {
            done = true;
            break;
        }
    }

    // A budget-truncated episode continues past what we observed; estimate
    // the remainder from the final reached state. A finished episode has no
    // remainder.
    let bootstrap = if done {
        0.0
    } else {
        value
            .forward(single_state_tensor::<B>(&state, device))
            .into_scalar()
            .elem::<f32>()
    };

    let steps = if done {
        states.len()
    } else {
        states.len().saturating_sub(1)
    };

    debug!(
        length = states.len(),
        steps,
        done,
        bootstrap,
        "collected rollout"
    );

    Ok(Rollout {
        states,
        actions,
        rewards,
        steps,
        bootstrap,
    })
}

fn single_state_tensor<B: Backend>(state: &[f32], device: &B::Device) -> Tensor<B, 2> {
    Tensor::from_data(TensorData::new(state.to_vec(), [1, state.len()]), device)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
