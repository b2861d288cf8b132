//! Cart-pole balancing environment.
//!
//! A pole is hinged to a cart that slides along a frictionless track; the
//! agent pushes the cart left or right with a fixed force and is rewarded
//! for every tick the pole stays upright. The episode ends when the pole
//! tips past the failure angle, the cart leaves the track, or the episode
//! step limit is reached.
//!
//! Dynamics are the classic control formulation (Barto, Sutton & Anderson,
//! 1983) integrated with the Euler method at a fixed tick.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::traits::{Environment, StepOutcome};

/// Push the cart toward negative x.
pub const ACTION_LEFT: usize = 0;
/// Push the cart toward positive x.
pub const ACTION_RIGHT: usize = 1;

/// Configuration for a cart-pole instance.
#[derive(Clone, Debug)]
pub struct CartPoleConfig {
    /// Gravitational acceleration in m/s^2.
    pub gravity: f32,
    /// Cart mass in kg.
    pub cart_mass: f32,
    /// Pole mass in kg.
    pub pole_mass: f32,
    /// Half of the pole length in meters.
    pub pole_half_length: f32,
    /// Magnitude of the force applied to the cart per action.
    pub force_magnitude: f32,
    /// Integration timestep in seconds.
    pub tau: f32,
    /// Angle threshold for failure detection (radians from vertical).
    pub failure_angle: f32,
    /// Position threshold for failure detection (meters from center).
    pub position_limit: f32,
    /// Maximum number of ticks before the episode is truncated.
    pub episode_limit: usize,
    /// Reset draws every state component uniformly from (-span, span).
    pub reset_span: f32,
    /// Running-reward level at which the task counts as solved.
    pub reward_threshold: f32,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_half_length: 0.5,
            force_magnitude: 10.0,
            tau: 0.02,
            failure_angle: 12.0 * std::f32::consts::PI / 180.0,
            position_limit: 2.4,
            episode_limit: 200,
            reset_span: 0.05,
            reward_threshold: 195.0,
        }
    }
}

/// A cart-pole simulation exposing the [`Environment`] interface.
///
/// State layout: `[cart_x, cart_velocity, pole_angle, pole_angular_velocity]`.
#[derive(Debug)]
pub struct CartPoleEnv {
    config: CartPoleConfig,
    state: [f32; 4],
    step_count: usize,
    done: bool,
    rng: StdRng,
}

impl CartPoleEnv {
    /// Create a new environment with entropy-seeded reset noise.
    pub fn new(config: CartPoleConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create a new environment with deterministic reset noise.
    pub fn with_seed(config: CartPoleConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: CartPoleConfig, rng: StdRng) -> Self {
        Self {
            config,
            state: [0.0; 4],
            step_count: 0,
            done: true,
            rng,
        }
    }

    /// Whether the current episode has ended.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// One Euler integration tick under the given horizontal force.
    fn integrate(&mut self, force: f32) {
        let [x, x_dot, theta, theta_dot] = self.state;
        let cos_theta = theta.cos();
        let sin_theta = theta.sin();

        let total_mass = self.config.cart_mass + self.config.pole_mass;
        let polemass_length = self.config.pole_mass * self.config.pole_half_length;

        let temp = (force + polemass_length * theta_dot * theta_dot * sin_theta) / total_mass;
        let theta_acc = (self.config.gravity * sin_theta - cos_theta * temp)
            / (self.config.pole_half_length
                * (4.0 / 3.0 - self.config.pole_mass * cos_theta * cos_theta / total_mass));
        let x_acc = temp - polemass_length * theta_acc * cos_theta / total_mass;

        let tau = self.config.tau;
        self.state = [
            x + tau * x_dot,
            x_dot + tau * x_acc,
            theta + tau * theta_dot,
            theta_dot + tau * theta_acc,
        ];
    }

    /// Whether the cart or pole has left the allowed envelope.
    fn failed(&self) -> bool {
        self.state[0].abs() > self.config.position_limit
            || self.state[2].abs() > self.config.failure_angle
    }
}

impl Environment for CartPoleEnv {
    fn reset(&mut self) -> Result<Vec<f32>> {
        let span = self.config.reset_span;
        for component in &mut self.state {
            *component = self.rng.gen_range(-span..span);
        }
        self.step_count = 0;
        self.done = false;
        Ok(self.state.to_vec())
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome> {
        if self.done {
            bail!("step called on a finished episode; call reset first");
        }
        let force = match action {
            ACTION_LEFT => -self.config.force_magnitude,
            ACTION_RIGHT => self.config.force_magnitude,
            other => bail!("invalid action index {other} for a 2-action environment"),
        };

        self.integrate(force);
        self.step_count += 1;

        let terminated = self.failed();
        let truncated = self.step_count >= self.config.episode_limit;
        self.done = terminated || truncated;

        Ok(StepOutcome {
            state: self.state.to_vec(),
            reward: 1.0,
            done: self.done,
            info: serde_json::json!({
                "terminated": terminated,
                "truncated": truncated,
                "step": self.step_count,
            }),
        })
    }

    fn state_dim(&self) -> usize {
        4
    }

    fn action_dim(&self) -> usize {
        2
    }

    fn reward_threshold(&self) -> f32 {
        self.config.reward_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_draws_within_span() {
        let mut env = CartPoleEnv::with_seed(CartPoleConfig::default(), 7);
        for _ in 0..20 {
            let state = env.reset().unwrap();
            assert_eq!(state.len(), 4);
            for component in state {
                assert!(component.abs() < 0.05, "component out of span: {component}");
            }
        }
    }

    #[test]
    fn reset_is_deterministic_under_a_fixed_seed() {
        let mut a = CartPoleEnv::with_seed(CartPoleConfig::default(), 42);
        let mut b = CartPoleEnv::with_seed(CartPoleConfig::default(), 42);
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    }

    #[test]
    fn constant_push_terminates_the_episode() {
        let mut env = CartPoleEnv::with_seed(CartPoleConfig::default(), 3);
        env.reset().unwrap();

        let mut last = None;
        for _ in 0..200 {
            let outcome = env.step(ACTION_RIGHT).unwrap();
            let finished = outcome.done;
            last = Some(outcome);
            if finished {
                break;
            }
        }

        let last = last.unwrap();
        assert!(last.done, "runaway cart should end the episode");
        assert_eq!(last.info["terminated"], serde_json::json!(true));
    }

    #[test]
    fn episode_truncates_at_the_step_limit() {
        // Huge envelope so only the step limit can end the episode.
        let config = CartPoleConfig {
            failure_angle: 100.0,
            position_limit: 1e6,
            episode_limit: 3,
            ..CartPoleConfig::default()
        };
        let mut env = CartPoleEnv::with_seed(config, 1);
        env.reset().unwrap();

        assert!(!env.step(ACTION_LEFT).unwrap().done);
        assert!(!env.step(ACTION_RIGHT).unwrap().done);
        let outcome = env.step(ACTION_LEFT).unwrap();
        assert!(outcome.done);
        assert_eq!(outcome.info["truncated"], serde_json::json!(true));
    }

    #[test]
    fn stepping_a_finished_episode_is_an_error() {
        let config = CartPoleConfig {
            episode_limit: 1,
            ..CartPoleConfig::default()
        };
        let mut env = CartPoleEnv::with_seed(config, 5);
        env.reset().unwrap();
        assert!(env.step(ACTION_LEFT).unwrap().done);
        assert!(env.is_done());
        assert!(env.step(ACTION_LEFT).is_err());

        // A reset clears the flag.
        env.reset().unwrap();
        assert!(!env.is_done());
        assert!(env.step(ACTION_LEFT).is_ok());
    }

    #[test]
    fn invalid_action_is_rejected() {
        let mut env = CartPoleEnv::with_seed(CartPoleConfig::default(), 5);
        env.reset().unwrap();
        assert!(env.step(2).is_err());
    }

    #[test]
    fn metadata_matches_the_classic_task() {
        let env = CartPoleEnv::with_seed(CartPoleConfig::default(), 0);
        assert_eq!(env.state_dim(), 4);
        assert_eq!(env.action_dim(), 2);
        assert!((env.reward_threshold() - 195.0).abs() < f32::EPSILON);
    }
}
