//! Advantage actor-critic (A2C) updates.
//!
//! Per rollout:
//!
//!   advantage  = discounted_return - detach(value(state))
//!   actor loss = -mean(log pi(a|s) * advantage)
//!   critic loss = MSE(value(state), discounted_return)
//!
//! The value estimate subtracted inside the advantage is detached, so the
//! actor's backward pass never reaches the critic's parameters. Actor and
//! critic keep separate optimizers and parameter sets; each takes exactly
//! one Adam step per rollout.

use anyhow::{bail, Result};
use burn::{
    nn::loss::{MseLoss, Reduction},
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    tensor::{activation, backend::AutodiffBackend, ElementConversion, Tensor, TensorData},
};
use tracing::debug;

use crate::config::A2cConfig;
use crate::model::{PolicyNet, PolicyNetConfig, ValueNet, ValueNetConfig};
use crate::trajectory::Rollout;

use super::agent::{PolicyGradient, UpdateStats};
use super::returns::discount_rewards;

/// A2C actor-critic pair with independent Adam optimizers.
pub struct A2cAgent<B: AutodiffBackend> {
    policy: PolicyNet<B>,
    value: ValueNet<B>,
    policy_optim: OptimizerAdaptor<Adam<B::InnerBackend>, PolicyNet<B>, B>,
    value_optim: OptimizerAdaptor<Adam<B::InnerBackend>, ValueNet<B>, B>,
    config: A2cConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> A2cAgent<B> {
    /// Create a fresh agent for an environment with the given dimensions.
    pub fn new(state_dim: usize, action_dim: usize, config: A2cConfig, device: B::Device) -> Self {
        let policy = PolicyNetConfig::new(state_dim, action_dim)
            .with_hidden_size(config.hidden_size)
            .init(&device);
        let value = ValueNetConfig::new(state_dim)
            .with_hidden_size(config.hidden_size)
            .init(&device);

        Self {
            policy,
            value,
            policy_optim: AdamConfig::new().init::<B, PolicyNet<B>>(),
            value_optim: AdamConfig::new().init::<B, ValueNet<B>>(),
            config,
            device,
        }
    }

    /// Actor objective: negative mean of taken-action log-probability times
    /// advantage, with the value baseline detached.
    fn actor_loss(
        &self,
        rollout: &Rollout,
        states: Tensor<B, 2>,
        targets: Tensor<B, 1>,
    ) -> Tensor<B, 1> {
        let n = rollout.len();
        let baseline = self.value.forward(states.clone()).reshape([n]).detach();
        let advantages = targets - baseline;

        let log_probs = activation::log_softmax(self.policy.forward(states), 1);
        let [_, action_dim] = log_probs.dims();
        let one_hot = rollout.one_hot_actions::<B>(action_dim, &self.device);
        let taken_log_probs = (log_probs * one_hot).sum_dim(1).reshape([n]);

        (taken_log_probs * advantages).mean().neg()
    }
}

impl<B: AutodiffBackend> PolicyGradient<B> for A2cAgent<B> {
    fn policy(&self) -> &PolicyNet<B> {
        &self.policy
    }

    fn value(&self) -> &ValueNet<B> {
        &self.value
    }

    fn rollout_budget(&self) -> usize {
        self.config.sample_nums
    }

    fn update(&mut self, rollout: &Rollout) -> Result<UpdateStats> {
        if rollout.is_empty() {
            bail!("cannot update from an empty rollout");
        }
        let n = rollout.len();

        let states = rollout.states_tensor::<B>(&self.device);
        let returns = discount_rewards(&rollout.rewards, self.config.gamma, rollout.bootstrap);
        let targets = Tensor::<B, 1>::from_data(TensorData::new(returns, [n]), &self.device);

        // Actor step.
        let actor_loss = self.actor_loss(rollout, states.clone(), targets.clone());
        let actor_loss_val = actor_loss.clone().into_scalar().elem::<f32>();
        let grads = GradientsParams::from_grads(actor_loss.backward(), &self.policy);
        self.policy = self
            .policy_optim
            .step(self.config.actor_lr, self.policy.clone(), grads);

        // Critic step: regress values onto the discounted returns.
        let values = self.value.forward(states).reshape([n]);
        let critic_loss = MseLoss::new().forward(values, targets, Reduction::Mean);
        let critic_loss_val = critic_loss.clone().into_scalar().elem::<f32>();
        let grads = GradientsParams::from_grads(critic_loss.backward(), &self.value);
        self.value = self
            .value_optim
            .step(self.config.critic_lr, self.value.clone(), grads);

        debug!(
            actor_loss = actor_loss_val,
            critic_loss = critic_loss_val,
            batch = n,
            "a2c update"
        );

        Ok(UpdateStats {
            actor_loss: actor_loss_val,
            critic_loss: critic_loss_val,
            mean_ratio: None,
            clip_fraction: None,
        })
    }

    fn end_episode(&mut self, _episode: usize) {}
}
