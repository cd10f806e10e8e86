mod mlp_policy;

pub use mlp_policy::{bootstrapped_target, MlpPolicy};

use crate::error::CoreError;
use crate::network::activation::Activation;
use crate::network::Solver;

/// Configuration of the action-value approximator regressor.
#[derive(Debug, Clone, PartialEq)]
pub struct MlpConfig {
    /// Widths of the hidden layers, input to output.
    pub hidden_layer_sizes: Vec<usize>,
    pub activation: Activation,
    pub solver: Solver,
    /// Scales the regressor's internal gradient step. The update rule
    /// itself is not learning-rate-scaled.
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// When false, the network is re-initialized before every fit and no
    /// learning accumulates. Leave enabled for online learning.
    pub warm_start: bool,
    /// Seed for weight initialization; `None` draws one from the OS.
    pub random_state: Option<u64>,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_layer_sizes: vec![2],
            activation: Activation::Tanh,
            solver: Solver::Sgd,
            learning_rate: 1.0,
            discount_factor: 0.5,
            warm_start: true,
            random_state: None,
        }
    }
}

impl MlpConfig {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.hidden_layer_sizes.is_empty() || self.hidden_layer_sizes.contains(&0) {
            return Err(CoreError::DegenerateConfiguration(
                "hidden layer sizes must be non-empty and positive",
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(CoreError::DegenerateConfiguration(
                "learning rate must be positive",
            ));
        }
        if !(self.discount_factor >= 0.0 && self.discount_factor.is_finite()) {
            return Err(CoreError::DegenerateConfiguration(
                "discount factor must be finite and non-negative",
            ));
        }
        Ok(())
    }
}
