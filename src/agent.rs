use crate::env::{DiscreteAction, State};
use crate::error::CoreError;
use crate::policy::MlpPolicy;

/// Learning agent: owns the current state, the cumulative score and the
/// approximator, and enforces the choose/learn pairing of each decision
/// cycle.
///
/// `choose_action` caches the action-value vector it obtained; the very
/// next `learn` consumes that cache. Calling `learn` without a fresh
/// `choose_action` fails with [`CoreError::NoCachedVector`] instead of
/// silently reusing a stale vector.
#[derive(Debug)]
pub struct Agent<A, const N: usize> {
    policy: MlpPolicy<A, N>,
    state: State,
    score: f64,
    cached_q: Option<[f64; N]>,
}

impl<A: DiscreteAction, const N: usize> Agent<A, N> {
    pub fn new(policy: MlpPolicy<A, N>, initial_state: State) -> Self {
        Self {
            policy,
            state: initial_state,
            score: 0.0,
            cached_q: None,
        }
    }

    /// Start a new episode: state back to the initial observation, score
    /// zeroed, pending cache dropped. The approximator keeps everything it
    /// learned; persistence across episodes is the point.
    pub fn reset(&mut self, initial_state: State) {
        self.state = initial_state;
        self.score = 0.0;
        self.cached_q = None;
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Sum of all rewards received since the last reset.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The action-value vector retained from the last `choose_action`,
    /// if `learn` has not consumed it yet.
    pub fn cached_q(&self) -> Option<[f64; N]> {
        self.cached_q
    }

    /// Greedy action for the current state. Caching the returned vector
    /// for the paired `learn` call is a required side effect, not an
    /// optimization.
    pub fn choose_action(&mut self) -> Result<A, CoreError> {
        let (action, q_vector) = self.policy.best_action(&self.state)?;
        self.cached_q = Some(q_vector);
        Ok(action)
    }

    /// Feed back the transition outcome: one approximator update with the
    /// previous/new state pairing, then advance the state pointer and
    /// accumulate the score. Returns the regressor's training loss.
    pub fn learn(&mut self, action: A, new_state: State, reward: f64) -> Result<f64, CoreError> {
        let cached = self.cached_q.take().ok_or(CoreError::NoCachedVector)?;
        let loss = self
            .policy
            .update(&self.state, &new_state, action, reward, &cached)?;
        self.state = new_state;
        self.score += reward;
        tracing::debug!(score = self.score, loss, "transition learned");
        Ok(loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::JumpAction;
    use crate::policy::MlpConfig;

    fn agent(seed: u64) -> Agent<JumpAction, 3> {
        let policy = MlpPolicy::new(MlpConfig {
            random_state: Some(seed),
            ..MlpConfig::default()
        })
        .unwrap();
        Agent::new(policy, State(0.5, 0.5))
    }

    #[test]
    fn learn_accumulates_score_and_clears_cache() {
        let mut a = agent(13);
        let action = a.choose_action().unwrap();
        assert!(a.cached_q().is_some());

        let new_state = State(0.55, 0.5);
        a.learn(action, new_state, 50.0).unwrap();
        assert_eq!(a.score(), 50.0);
        assert_eq!(a.state(), new_state);
        assert_eq!(a.cached_q(), None);

        // no fresh choose_action in this cycle
        assert_eq!(
            a.learn(action, new_state, 1.0),
            Err(CoreError::NoCachedVector)
        );
    }

    #[test]
    fn learn_without_any_choice_is_rejected() {
        let mut a = agent(13);
        assert_eq!(
            a.learn(JumpAction::Left, State(0.1, 0.1), -5.0),
            Err(CoreError::NoCachedVector)
        );
    }

    #[test]
    fn reset_zeroes_score_but_keeps_parameters() {
        let mut a = agent(29);
        let initial = a.state();
        let action = a.choose_action().unwrap();
        let q_before = a.cached_q().unwrap();
        a.learn(action, State(0.6, 0.5), -5.0).unwrap();
        assert_eq!(a.score(), -5.0);

        a.reset(initial);
        assert_eq!(a.score(), 0.0);
        assert_eq!(a.state(), initial);
        assert_eq!(a.cached_q(), None);

        // parameters survived the reset: the greedy query still answers,
        // and with values learned after the update (not the pre-update q)
        let _ = a.choose_action().unwrap();
        let q_after = a.cached_q().unwrap();
        assert!(q_after.iter().all(|v| v.is_finite()));
        assert_ne!(q_before, q_after);
    }

    #[test]
    fn score_accumulates_across_cycles() {
        let mut a = agent(31);
        for (reward, expected) in [(50.0, 50.0), (-5.0, 45.0), (-1.0, 44.0)] {
            let action = a.choose_action().unwrap();
            a.learn(action, State(0.5, 0.5), reward).unwrap();
            assert_eq!(a.score(), expected);
        }
    }
}
