//! Policy network: state batch -> action logits.

use burn::{
    config::Config,
    module::Module,
    nn::Linear,
    tensor::{activation, backend::Backend, Tensor},
};

use super::linear_with_init;

/// Configuration for [`PolicyNet`].
#[derive(Config, Debug)]
pub struct PolicyNetConfig {
    /// Length of the state vector.
    pub state_dim: usize,
    /// Number of discrete actions.
    pub action_dim: usize,
    /// Hidden layer width.
    #[config(default = 64)]
    pub hidden_size: usize,
    /// Use Xavier-uniform weight initialization instead of the backend
    /// default.
    #[config(default = false)]
    pub xavier_init: bool,
}

impl PolicyNetConfig {
    /// Initialize a fresh policy network on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> PolicyNet<B> {
        PolicyNet {
            fc1: linear_with_init(self.state_dim, self.hidden_size, self.xavier_init, device),
            fc2: linear_with_init(self.hidden_size, self.hidden_size, self.xavier_init, device),
            fc3: linear_with_init(self.hidden_size, self.action_dim, self.xavier_init, device),
        }
    }
}

/// A three-layer ReLU MLP producing one logit per action.
///
/// The output stays in logit space; call sites apply `softmax` or
/// `log_softmax`, so the sampling and log-probability paths share one
/// forward definition.
#[derive(Module, Debug)]
pub struct PolicyNet<B: Backend> {
    pub(crate) fc1: Linear<B>,
    pub(crate) fc2: Linear<B>,
    pub(crate) fc3: Linear<B>,
}

impl<B: Backend> PolicyNet<B> {
    /// Forward pass over a `[batch, state_dim]` tensor, returning
    /// `[batch, action_dim]` logits.
    pub fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = activation::relu(self.fc1.forward(states));
        let x = activation::relu(self.fc2.forward(x));
        self.fc3.forward(x)
    }
}
