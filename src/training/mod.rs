//! Policy-gradient training: return estimation, update rules, episode loop.
//!
//! This module implements both training algorithms, A2C's advantage-weighted
//! log-probability objective and PPO's clipped importance-ratio surrogate,
//! behind the shared [`agent::PolicyGradient`] interface, along with the
//! discounted-return estimator and the session loop that drives them.

pub mod a2c;
pub mod agent;
pub mod pipeline;
pub mod ppo;
pub mod returns;

pub use a2c::A2cAgent;
pub use agent::{PolicyGradient, UpdateStats};
pub use pipeline::{TrainerSession, TrainingReport};
pub use ppo::PpoAgent;
pub use returns::discount_rewards;
