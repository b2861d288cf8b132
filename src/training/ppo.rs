//! Proximal policy optimization (PPO) updates.
//!
//! The actor objective is the clipped importance-ratio surrogate:
//!
//!   rho   = exp(log pi_theta(a|s) - log pi_target(a|s))
//!   L     = -mean(min(rho * A, clip(rho, 1-eps, 1+eps) * A))
//!
//! taking the pessimistic minimum of the two surrogates so a ratio that
//! departs too far from 1 cannot drive a destructively large policy step.
//! The reference distribution comes from target networks: wholesale
//! snapshots of the live networks, re-synchronized every
//! `target_update_step` episodes and frozen in between. The critic trains
//! against discounted returns with the live value network, exactly as in
//! A2C.

use anyhow::{anyhow, bail, Result};
use burn::{
    nn::loss::{MseLoss, Reduction},
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    tensor::{activation, backend::AutodiffBackend, ElementConversion, Tensor, TensorData},
};
use tracing::debug;

use crate::config::PpoConfig;
use crate::model::{PolicyNet, PolicyNetConfig, ValueNet, ValueNetConfig};
use crate::trajectory::Rollout;

use super::agent::{PolicyGradient, UpdateStats};
use super::returns::discount_rewards;

/// PPO actor-critic pair with frozen target snapshots.
pub struct PpoAgent<B: AutodiffBackend> {
    policy: PolicyNet<B>,
    value: ValueNet<B>,
    target_policy: PolicyNet<B>,
    target_value: ValueNet<B>,
    policy_optim: OptimizerAdaptor<Adam<B::InnerBackend>, PolicyNet<B>, B>,
    value_optim: OptimizerAdaptor<Adam<B::InnerBackend>, ValueNet<B>, B>,
    config: PpoConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> PpoAgent<B> {
    /// Create a fresh agent; targets start as copies of the live networks.
    pub fn new(state_dim: usize, action_dim: usize, config: PpoConfig, device: B::Device) -> Self {
        let policy = PolicyNetConfig::new(state_dim, action_dim)
            .with_hidden_size(config.hidden_size)
            .with_xavier_init(true)
            .init(&device);
        let value = ValueNetConfig::new(state_dim)
            .with_hidden_size(config.hidden_size)
            .with_xavier_init(true)
            .init(&device);
        let target_policy = policy.clone();
        let target_value = value.clone();

        Self {
            policy,
            value,
            target_policy,
            target_value,
            policy_optim: AdamConfig::new().init::<B, PolicyNet<B>>(),
            value_optim: AdamConfig::new().init::<B, ValueNet<B>>(),
            config,
            device,
        }
    }

    /// Overwrite both target networks with the current live parameters.
    pub fn sync_targets(&mut self) {
        self.target_policy = self.policy.clone();
        self.target_value = self.value.clone();
    }

    /// The frozen value snapshot taken at the last target sync.
    pub fn target_value(&self) -> &ValueNet<B> {
        &self.target_value
    }

    /// Clipped-surrogate actor objective.
    ///
    /// Returns the loss tensor along with the batch-mean importance ratio
    /// and the fraction of ratios the epsilon bound actually clipped.
    fn clipped_surrogate(
        &self,
        rollout: &Rollout,
        states: Tensor<B, 2>,
        targets: Tensor<B, 1>,
    ) -> Result<(Tensor<B, 1>, f32, f32)> {
        let n = rollout.len();
        let epsilon = self.config.clip_param;

        let baseline = self.value.forward(states.clone()).reshape([n]).detach();
        let advantages = targets - baseline;

        let actions = rollout.action_indices::<B>(&self.device);
        let log_probs = activation::log_softmax(self.policy.forward(states.clone()), 1)
            .gather(1, actions.clone())
            .reshape([n]);
        // The target side of the ratio is a frozen reference; it never
        // receives gradient.
        let old_log_probs = activation::log_softmax(self.target_policy.forward(states), 1)
            .gather(1, actions)
            .reshape([n])
            .detach();

        let ratio = (log_probs - old_log_probs).exp();

        let ratio_vals: Vec<f32> = ratio
            .clone()
            .detach()
            .into_data()
            .to_vec()
            .map_err(|e| anyhow!("failed to read importance ratios: {e:?}"))?;
        let mean_ratio = ratio_vals.iter().sum::<f32>() / n as f32;
        let clipped_count = ratio_vals
            .iter()
            .filter(|&&r| (r.clamp(1.0 - epsilon, 1.0 + epsilon) - r).abs() > 1e-6)
            .count();
        let clip_fraction = clipped_count as f32 / n as f32;

        let surr_unclipped = ratio.clone() * advantages.clone();
        let surr_clipped = ratio.clamp(1.0 - epsilon, 1.0 + epsilon) * advantages;
        let loss = surr_unclipped.min_pair(surr_clipped).mean().neg();

        Ok((loss, mean_ratio, clip_fraction))
    }
}

impl<B: AutodiffBackend> PolicyGradient<B> for PpoAgent<B> {
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
        let (actor_loss, mean_ratio, clip_fraction) =
            self.clipped_surrogate(rollout, states.clone(), targets.clone())?;
        let actor_loss_val = actor_loss.clone().into_scalar().elem::<f32>();
        let grads = GradientsParams::from_grads(actor_loss.backward(), &self.policy);
        self.policy = self
            .policy_optim
            .step(self.config.actor_lr, self.policy.clone(), grads);

        // Critic step: live value network, same regression target as A2C.
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
            mean_ratio,
            clip_fraction,
            batch = n,
            "ppo update"
        );

        Ok(UpdateStats {
            actor_loss: actor_loss_val,
            critic_loss: critic_loss_val,
            mean_ratio: Some(mean_ratio),
            clip_fraction: Some(clip_fraction),
        })
    }

    fn end_episode(&mut self, episode: usize) {
        if self.config.target_update_step == 0 {
            return;
        }
        if episode % self.config.target_update_step == 0 {
            self.sync_targets();
            debug!(episode, "synchronized target networks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeeterConfig;
    use crate::trajectory::SampledAction;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    fn test_config() -> PpoConfig {
        TeeterConfig::default().ppo
    }

    fn short_rollout() -> Rollout {
        Rollout {
            states: vec![
                vec![0.0, 0.1, -0.1, 0.2],
                vec![0.1, 0.2, -0.05, 0.1],
                vec![0.2, 0.1, 0.0, 0.0],
                vec![0.3, 0.0, 0.05, -0.1],
            ],
            actions: vec![
                SampledAction { index: 0, log_prob: -0.7 },
                SampledAction { index: 1, log_prob: -0.6 },
                SampledAction { index: 1, log_prob: -0.5 },
                SampledAction { index: 0, log_prob: -0.9 },
            ],
            rewards: vec![1.0, 1.0, 1.0, 1.0],
            steps: 4,
            bootstrap: 0.5,
        }
    }

    fn policy_weights(net: &PolicyNet<TestBackend>) -> Vec<f32> {
        net.fc1.weight.val().to_data().to_vec().unwrap()
    }

    #[test]
    fn fresh_targets_make_every_ratio_one() {
        let device = Default::default();
        let mut agent = PpoAgent::<TestBackend>::new(4, 2, test_config(), device);

        // Live and target policies are parameter-identical at construction,
        // so the surrogate is unclipped everywhere.
        let stats = agent.update(&short_rollout()).unwrap();
        assert!((stats.mean_ratio.unwrap() - 1.0).abs() < 1e-5);
        assert_eq!(stats.clip_fraction.unwrap(), 0.0);
    }

    #[test]
    fn targets_stay_frozen_between_syncs() {
        let device = Default::default();
        let mut agent = PpoAgent::<TestBackend>::new(4, 2, test_config(), device);
        let rollout = short_rollout();

        agent.update(&rollout).unwrap();
        assert_ne!(
            policy_weights(&agent.policy),
            policy_weights(&agent.target_policy),
            "an update must move the live policy away from the target"
        );

        // Not a sync episode: the target keeps its old parameters.
        agent.end_episode(9);
        assert_ne!(
            policy_weights(&agent.policy),
            policy_weights(&agent.target_policy)
        );

        // Sync episode: both targets snapshot the live parameters as of now.
        agent.end_episode(10);
        assert_eq!(
            policy_weights(&agent.policy),
            policy_weights(&agent.target_policy)
        );
        assert_eq!(
            agent.value.fc1.weight.val().to_data().to_vec::<f32>().unwrap(),
            agent
                .target_value()
                .fc1
                .weight
                .val()
                .to_data()
                .to_vec::<f32>()
                .unwrap()
        );
        let snapshot = policy_weights(&agent.target_policy);

        // Later updates move the live policy but not the stored snapshot.
        agent.update(&rollout).unwrap();
        assert_eq!(policy_weights(&agent.target_policy), snapshot);
        assert_ne!(policy_weights(&agent.policy), snapshot);
    }

    #[test]
    fn surrogate_backward_touches_only_the_live_policy() {
        let device: <TestBackend as burn::tensor::backend::Backend>::Device = Default::default();
        let agent = PpoAgent::<TestBackend>::new(4, 2, test_config(), device.clone());

        let rollout = short_rollout();
        let states = rollout.states_tensor::<TestBackend>(&device);
        let returns = discount_rewards(&rollout.rewards, 0.99, rollout.bootstrap);
        let targets =
            Tensor::<TestBackend, 1>::from_data(TensorData::new(returns, [rollout.len()]), &device);

        let (loss, _, _) = agent.clipped_surrogate(&rollout, states, targets).unwrap();
        let grads = loss.backward();

        assert!(agent.policy.fc1.weight.val().grad(&grads).is_some());
        // Detached reference distribution and baseline: no gradient reaches
        // the target policy or the value network.
        assert!(agent.target_policy.fc1.weight.val().grad(&grads).is_none());
        assert!(agent.value.fc1.weight.val().grad(&grads).is_none());
    }

    #[test]
    fn empty_rollout_is_rejected() {
        let device = Default::default();
        let mut agent = PpoAgent::<TestBackend>::new(4, 2, test_config(), device);
        let empty = Rollout {
            states: vec![],
            actions: vec![],
            rewards: vec![],
            steps: 0,
            bootstrap: 0.0,
        };
        assert!(agent.update(&empty).is_err());
    }
}
