//! Value network: state batch -> scalar value estimates.

use burn::{
    config::Config,
    module::Module,
    nn::Linear,
    tensor::{activation, backend::Backend, Tensor},
};

use super::linear_with_init;

/// Configuration for [`ValueNet`].
#[derive(Config, Debug)]
pub struct ValueNetConfig {
    /// Length of the state vector.
    pub state_dim: usize,
    /// Hidden layer width.
    #[config(default = 64)]
    pub hidden_size: usize,
    /// Use Xavier-uniform weight initialization instead of the backend
    /// default.
    #[config(default = false)]
    pub xavier_init: bool,
}

impl ValueNetConfig {
    /// Initialize a fresh value network on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ValueNet<B> {
        ValueNet {
            fc1: linear_with_init(self.state_dim, self.hidden_size, self.xavier_init, device),
            fc2: linear_with_init(self.hidden_size, self.hidden_size, self.xavier_init, device),
            fc3: linear_with_init(self.hidden_size, 1, self.xavier_init, device),
        }
    }
}

/// A three-layer ReLU MLP regressing one value per state.
#[derive(Module, Debug)]
pub struct ValueNet<B: Backend> {
    pub(crate) fc1: Linear<B>,
    pub(crate) fc2: Linear<B>,
    pub(crate) fc3: Linear<B>,
}

impl<B: Backend> ValueNet<B> {
    /// Forward pass over a `[batch, state_dim]` tensor, returning a
    /// `[batch, 1]` value column.
    pub fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = activation::relu(self.fc1.forward(states));
        let x = activation::relu(self.fc2.forward(x));
        self.fc3.forward(x)
    }
}
