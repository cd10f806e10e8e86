use enum_dispatch::enum_dispatch;

use crate::agent::Agent;
use crate::env::{DiscreteAction, State};
use crate::error::CoreError;

/// Accumulate-and-compare gate for the decision cycle.
///
/// The simulation runs every frame; the agent is only polled once the
/// accumulated frame deltas reach the decision interval. Deltas are
/// supplied by the caller in simulated time; no wall clock in the core.
#[derive(Debug, Clone, Copy)]
pub struct DecisionTimer {
    interval: f64,
    accumulated: f64,
}

impl DecisionTimer {
    pub fn new(interval: f64) -> Result<Self, CoreError> {
        if !(interval > 0.0 && interval.is_finite()) {
            return Err(CoreError::DegenerateConfiguration(
                "decision interval must be positive and finite",
            ));
        }
        Ok(Self {
            interval,
            accumulated: 0.0,
        })
    }

    /// Feed one frame delta; true means "poll the agent now" and rearms
    /// the gate.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.accumulated += dt;
        if self.accumulated >= self.interval {
            self.accumulated = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

/// One decision-maker driving an episode, learned or not.
///
/// The scripted variant is the pre-learning prototype: a fixed action each
/// cycle and score bookkeeping, nothing else.
#[enum_dispatch]
pub trait Controller<A: DiscreteAction> {
    fn begin_episode(&mut self, initial_state: State);
    fn act(&mut self) -> Result<A, CoreError>;
    fn feedback(&mut self, action: A, new_state: State, reward: f64) -> Result<(), CoreError>;
    fn score(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct ScriptedControl<A> {
    action: A,
    score: f64,
}

impl<A: DiscreteAction> ScriptedControl<A> {
    pub fn new(action: A) -> Self {
        Self { action, score: 0.0 }
    }
}

impl<A: DiscreteAction> Controller<A> for ScriptedControl<A> {
    fn begin_episode(&mut self, _initial_state: State) {
        self.score = 0.0;
    }

    fn act(&mut self) -> Result<A, CoreError> {
        Ok(self.action)
    }

    fn feedback(&mut self, _action: A, _new_state: State, reward: f64) -> Result<(), CoreError> {
        self.score += reward;
        Ok(())
    }

    fn score(&self) -> f64 {
        self.score
    }
}

impl<A: DiscreteAction, const N: usize> Controller<A> for Agent<A, N> {
    fn begin_episode(&mut self, initial_state: State) {
        self.reset(initial_state);
    }

    fn act(&mut self) -> Result<A, CoreError> {
        self.choose_action()
    }

    fn feedback(&mut self, action: A, new_state: State, reward: f64) -> Result<(), CoreError> {
        self.learn(action, new_state, reward)?;
        Ok(())
    }

    fn score(&self) -> f64 {
        Agent::score(self)
    }
}

#[enum_dispatch(Controller<A>)]
pub enum EnumController<A: DiscreteAction, const N: usize> {
    Scripted(ScriptedControl<A>),
    Learning(Agent<A, N>),
}
