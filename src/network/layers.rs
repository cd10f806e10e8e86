use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Layer {
    /// Computes the output Y of the layer for a given input X.
    fn forward(&mut self, input: ndarray::Array2<f64>) -> ndarray::Array2<f64>;
    /// Computes dE/dX for a given dE/dY and updates parameters if any.
    fn backward(
        &mut self,
        output_error: ndarray::Array2<f64>,
        learning_rate: f64,
        beta: f64,
    ) -> ndarray::Array2<f64>;
    /// Discard trained parameters and re-randomize.
    fn reset(&mut self);
}

pub struct DenseLayer {
    input: ndarray::Array2<f64>,
    weights: ndarray::Array2<f64>,
    bias: ndarray::Array2<f64>,
    velocity_w: ndarray::Array2<f64>,
    velocity_b: ndarray::Array2<f64>,
    rng: StdRng,
}

impl DenseLayer {
    /// Glorot-style uniform init; the layer keeps its own rng (derived
    /// from the caller's) so `reset` re-randomizes reproducibly.
    pub fn new(input_size: usize, output_size: usize, seed_rng: &mut StdRng) -> Self {
        let mut layer = Self {
            input: ndarray::Array2::zeros((1, input_size)),
            weights: ndarray::Array2::zeros((input_size, output_size)),
            bias: ndarray::Array2::zeros((1, output_size)),
            velocity_w: ndarray::Array2::zeros((input_size, output_size)),
            velocity_b: ndarray::Array2::zeros((1, output_size)),
            rng: StdRng::seed_from_u64(seed_rng.gen()),
        };
        layer.randomize();
        layer
    }

    fn randomize(&mut self) {
        let (input_size, output_size) = self.weights.dim();
        let bound = (6.0 / (input_size + output_size) as f64).sqrt();
        let dist = Uniform::new(-bound, bound);
        self.weights =
            ndarray::Array2::random_using((input_size, output_size), dist, &mut self.rng);
        self.bias = ndarray::Array2::random_using((1, output_size), dist, &mut self.rng);
        self.velocity_w.fill(0.0);
        self.velocity_b.fill(0.0);
    }
}

impl Layer for DenseLayer {
    fn forward(&mut self, input: ndarray::Array2<f64>) -> ndarray::Array2<f64> {
        self.input = input;
        self.input.dot(&self.weights) + &self.bias
    }

    fn backward(
        &mut self,
        output_error: ndarray::Array2<f64>,
        learning_rate: f64,
        beta: f64,
    ) -> ndarray::Array2<f64> {
        let input_error = output_error.dot(&self.weights.t());
        let weights_error = self.input.t().dot(&output_error);

        self.velocity_w = beta * &self.velocity_w - learning_rate * &weights_error;
        self.velocity_b = beta * &self.velocity_b - learning_rate * &output_error;
        self.weights = &self.weights + &self.velocity_w;
        self.bias = &self.bias + &self.velocity_b;

        input_error
    }

    fn reset(&mut self) {
        self.randomize();
    }
}

pub struct ActivationLayer {
    input: ndarray::Array2<f64>,
    activation: fn(&ndarray::Array2<f64>) -> ndarray::Array2<f64>,
    activation_prime: fn(&ndarray::Array2<f64>) -> ndarray::Array2<f64>,
}

impl ActivationLayer {
    pub fn new(
        activation: fn(&ndarray::Array2<f64>) -> ndarray::Array2<f64>,
        activation_prime: fn(&ndarray::Array2<f64>) -> ndarray::Array2<f64>,
    ) -> Self {
        Self {
            input: ndarray::Array2::zeros((0, 0)),
            activation,
            activation_prime,
        }
    }
}

impl Layer for ActivationLayer {
    fn forward(&mut self, input: ndarray::Array2<f64>) -> ndarray::Array2<f64> {
        self.input = input;
        (self.activation)(&self.input)
    }

    fn backward(
        &mut self,
        output_error: ndarray::Array2<f64>,
        _learning_rate: f64,
        _beta: f64,
    ) -> ndarray::Array2<f64> {
        (self.activation_prime)(&self.input) * output_error
    }

    fn reset(&mut self) {}
}
