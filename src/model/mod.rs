//! Function approximators for the actor-critic pair.
//!
//! This module provides:
//! - [`actor::PolicyNet`] -- maps states to action logits.
//! - [`critic::ValueNet`] -- maps states to scalar value estimates.
//!
//! Both are ordinary burn modules: parameter enumeration, gradient
//! participation, and wholesale cloning (used for PPO's target snapshots)
//! come from the `Module` derive rather than a bespoke trait.

pub mod actor;
pub mod critic;

pub use actor::{PolicyNet, PolicyNetConfig};
pub use critic::{ValueNet, ValueNetConfig};

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    tensor::backend::Backend,
};

/// Build a linear layer, optionally overriding the default initializer with
/// Xavier-uniform.
fn linear_with_init<B: Backend>(
    d_input: usize,
    d_output: usize,
    xavier: bool,
    device: &B::Device,
) -> Linear<B> {
    let mut config = LinearConfig::new(d_input, d_output);
    if xavier {
        config = config.with_initializer(Initializer::XavierUniform { gain: 1.0 });
    }
    config.init(device)
}
