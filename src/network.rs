use std::fmt::Debug;

use self::layers::Layer;

pub mod activation;
pub mod layers;
pub mod loss;

pub type LossFn = fn(&ndarray::Array2<f64>, &ndarray::Array2<f64>) -> Option<f64>;
pub type LossPrimeFn = fn(&ndarray::Array2<f64>, &ndarray::Array2<f64>) -> ndarray::Array2<f64>;

/// Stochastic gradient solver applied at every backward pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solver {
    Sgd,
    Momentum { beta: f64 },
}

impl Solver {
    pub(crate) fn beta(self) -> f64 {
        match self {
            Solver::Sgd => 0.0,
            Solver::Momentum { beta } => beta,
        }
    }
}

/// Small dense feed-forward regressor.
///
/// `fit` runs exactly one forward/backward pass, so parameters continue
/// from wherever the previous call left them; this is the warm-start
/// behavior the online control loop relies on.
pub struct Network {
    learning_rate: f64,
    solver: Solver,
    layers: Vec<Box<dyn Layer>>,
    loss: LossFn,
    loss_prime: LossPrimeFn,
}

impl Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("learning_rate", &self.learning_rate)
            .field("solver", &self.solver)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl Network {
    pub fn new(learning_rate: f64, solver: Solver, loss: LossFn, loss_prime: LossPrimeFn) -> Self {
        Self {
            learning_rate,
            solver,
            layers: vec![],
            loss,
            loss_prime,
        }
    }

    pub fn add(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer)
    }

    pub fn predict(&mut self, input: ndarray::Array2<f64>) -> ndarray::Array2<f64> {
        let mut output = input;
        for layer in &mut self.layers {
            output = layer.forward(output);
        }
        output
    }

    /// One incremental training step; returns the pre-update loss.
    pub fn fit(&mut self, x: ndarray::Array2<f64>, y: ndarray::Array2<f64>) -> f64 {
        let mut output = x;
        for layer in &mut self.layers {
            output = layer.forward(output);
        }

        let beta = self.solver.beta();
        let mut error = (self.loss_prime)(&y, &output);
        for layer in self.layers.iter_mut().rev() {
            error = layer.backward(error, self.learning_rate, beta);
        }

        (self.loss)(&y, &output).unwrap_or(0.0)
    }

    /// Re-randomize every layer, discarding trained parameters.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset()
        }
    }
}
