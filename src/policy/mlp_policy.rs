use std::marker::PhantomData;

use ndarray::arr2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::env::{DiscreteAction, State};
use crate::error::CoreError;
use crate::network::layers::{ActivationLayer, DenseLayer};
use crate::network::loss::{mse, mse_prime};
use crate::network::Network;
use crate::policy::MlpConfig;
use crate::utils::argmax;

/// Accumulation update target: the entry for the taken action accumulates
/// `reward + discount * max(q)` on top of the existing estimate. There is
/// no subtraction of the current estimate and no learning-rate scaling of
/// the residual; the learning rate lives in the regressor's own gradient
/// step. This departs from canonical Q-learning deliberately and must not
/// be "corrected" into it.
pub fn bootstrapped_target<const N: usize>(
    last_q: &[f64; N],
    action: usize,
    reward: f64,
    discount_factor: f64,
) -> [f64; N] {
    let max_q = last_q.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut target = *last_q;
    target[action] += reward + discount_factor * max_q;
    target
}

/// Action-value approximator: a tiny online-trainable regressor mapping a
/// normalized state to one scalar per action.
///
/// Parameters persist across episode resets; they are created once here
/// and only re-randomized by an explicit [`reset`](MlpPolicy::reset).
#[derive(Debug)]
pub struct MlpPolicy<A, const N: usize> {
    network: Network,
    discount_factor: f64,
    warm_start: bool,
    _action: PhantomData<A>,
}

impl<A: DiscreteAction, const N: usize> MlpPolicy<A, N> {
    pub fn new(config: MlpConfig) -> Result<Self, CoreError> {
        debug_assert_eq!(N, A::COUNT);
        config.validate()?;

        let mut rng = match config.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut network = Network::new(config.learning_rate, config.solver, mse, mse_prime);
        let mut in_size = 2;
        for &hidden in &config.hidden_layer_sizes {
            network.add(Box::new(DenseLayer::new(in_size, hidden, &mut rng)));
            network.add(Box::new(ActivationLayer::new(
                config.activation.f(),
                config.activation.prime(),
            )));
            in_size = hidden;
        }
        // identity output, regressor-style
        network.add(Box::new(DenseLayer::new(in_size, N, &mut rng)));

        let mut policy = Self {
            network,
            discount_factor: config.discount_factor,
            warm_start: config.warm_start,
            _action: PhantomData,
        };
        policy.seed_fit();
        Ok(policy)
    }

    /// One fit against the zero vector so `best_action` is defined before
    /// any real training step has happened.
    fn seed_fit(&mut self) {
        self.network.fit(
            ndarray::Array2::zeros((1, 2)),
            ndarray::Array2::zeros((1, N)),
        );
    }

    /// The state arrives already normalized by the adapter; this only
    /// reshapes it for the network.
    fn state_to_dataset(state: &State) -> ndarray::Array2<f64> {
        arr2(&[[state.0, state.1]])
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Greedy selection: the action with the strictly greatest value, ties
    /// broken by the lowest action index. Returns the full vector as well;
    /// the caller must retain it for the paired `update`.
    pub fn best_action(&mut self, state: &State) -> Result<(A, [f64; N]), CoreError> {
        let output = self.network.predict(Self::state_to_dataset(state));
        let mut q_vector = [0.0; N];
        for (i, q) in q_vector.iter_mut().enumerate() {
            *q = output[(0, i)];
        }
        let index = argmax(q_vector.iter());
        let action = A::try_from(index)?;
        tracing::trace!(?state, ?action, ?q_vector, "best action");
        Ok((action, q_vector))
    }

    /// One incremental training step toward the bootstrapped target.
    ///
    /// `last_q` must be the vector produced by the `best_action` call that
    /// selected `action`: the rule reads it, not a fresh prediction, and
    /// `next` is deliberately never consulted. The mutated vector is the
    /// full training target, so untouched slots keep their stale predicted
    /// values.
    pub fn update(
        &mut self,
        previous: &State,
        next: &State,
        action: A,
        reward: f64,
        last_q: &[f64; N],
    ) -> Result<f64, CoreError> {
        let index: usize = action.into();
        let target = bootstrapped_target(last_q, index, reward, self.discount_factor);
        tracing::debug!(?previous, ?next, index, reward, "one-step update");

        if !self.warm_start {
            self.network.reset();
        }
        let x = Self::state_to_dataset(previous);
        let y = ndarray::Array2::from_shape_vec((1, N), target.to_vec())
            .expect("target has exactly N elements");
        Ok(self.network.fit(x, y))
    }

    /// Discard all trained parameters and start over. Not part of the
    /// episode cycle; episode resets intentionally leave the policy alone.
    pub fn reset(&mut self) {
        self.network.reset();
        self.seed_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::JumpAction;

    fn policy(seed: u64) -> MlpPolicy<JumpAction, 3> {
        MlpPolicy::new(MlpConfig {
            random_state: Some(seed),
            ..MlpConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn best_action_before_training_is_defined() {
        let mut p = policy(11);
        let (action, q) = p.best_action(&State(0.5, 0.5)).unwrap();
        assert!(usize::from(action) < 3);
        assert_eq!(q.len(), 3);
        assert!(q.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn best_action_is_deterministic_without_updates() {
        let mut p = policy(11);
        let s = State(0.3, 0.8);
        let first = p.best_action(&s).unwrap();
        let second = p.best_action(&s).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn same_random_state_builds_identical_policies() {
        let mut a = policy(99);
        let mut b = policy(99);
        let s = State(0.1, 0.9);
        assert_eq!(a.best_action(&s).unwrap(), b.best_action(&s).unwrap());
    }

    #[test]
    fn accumulation_rule_arithmetic() {
        let q = [1.0, -2.0, 0.5];
        let target = bootstrapped_target(&q, 1, 50.0, 0.5);
        // q[1] + 50 + 0.5 * max(q) = -2 + 50 + 0.5
        assert_eq!(target[1], 48.5);
        // untouched slots keep their stale values
        assert_eq!(target[0], 1.0);
        assert_eq!(target[2], 0.5);
    }

    #[test]
    fn update_keeps_predictions_finite() {
        let mut p = policy(7);
        let s1 = State(0.2, 0.6);
        let s2 = State(0.25, 0.6);
        let (action, q) = p.best_action(&s1).unwrap();
        let loss = p.update(&s1, &s2, action, 50.0, &q).unwrap();
        assert!(loss.is_finite());
        let (_, q2) = p.best_action(&s2).unwrap();
        assert!(q2.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn out_of_range_state_does_not_panic() {
        let mut p = policy(3);
        // agent wrapped past the viewport edge
        let (_, q) = p.best_action(&State(-0.1, 0.55)).unwrap();
        assert!(q.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn cold_start_config_never_learns() {
        let mut p: MlpPolicy<JumpAction, 3> = MlpPolicy::new(MlpConfig {
            warm_start: false,
            random_state: Some(21),
            ..MlpConfig::default()
        })
        .unwrap();
        let s = State(0.4, 0.6);
        let (action, q) = p.best_action(&s).unwrap();
        // the fit is real but the parameters it trained are thrown away by
        // the re-initialization preceding the next fit
        p.update(&s, &s, action, 50.0, &q).unwrap();
        assert!(p.best_action(&s).unwrap().1.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        let bad_hidden = MlpPolicy::<JumpAction, 3>::new(MlpConfig {
            hidden_layer_sizes: vec![],
            ..MlpConfig::default()
        });
        assert!(matches!(
            bad_hidden,
            Err(CoreError::DegenerateConfiguration(_))
        ));

        let bad_lr = MlpPolicy::<JumpAction, 3>::new(MlpConfig {
            learning_rate: 0.0,
            ..MlpConfig::default()
        });
        assert!(matches!(bad_lr, Err(CoreError::DegenerateConfiguration(_))));
    }
}
