/// Smooth saturating nonlinearities for the hidden layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Tanh,
    Logistic,
}

impl Activation {
    pub fn f(self) -> fn(&ndarray::Array2<f64>) -> ndarray::Array2<f64> {
        match self {
            Activation::Tanh => tanh,
            Activation::Logistic => logistic,
        }
    }

    pub fn prime(self) -> fn(&ndarray::Array2<f64>) -> ndarray::Array2<f64> {
        match self {
            Activation::Tanh => tanh_prime,
            Activation::Logistic => logistic_prime,
        }
    }
}

pub fn tanh(x: &ndarray::Array2<f64>) -> ndarray::Array2<f64> {
    x.map(|v| v.tanh())
}

pub fn tanh_prime(x: &ndarray::Array2<f64>) -> ndarray::Array2<f64> {
    x.map(|v| 1.0 - v.tanh().powi(2))
}

pub fn logistic(x: &ndarray::Array2<f64>) -> ndarray::Array2<f64> {
    x.map(|v| 1.0 / (1.0 + (-v).exp()))
}

pub fn logistic_prime(x: &ndarray::Array2<f64>) -> ndarray::Array2<f64> {
    x.map(|v| {
        let s = 1.0 / (1.0 + (-v).exp());
        s * (1.0 - s)
    })
}
