use thiserror::Error;

/// Failure conditions surfaced by the control loop core.
///
/// All of these are recoverable by the caller; the driving game loop
/// decides whether to abort the episode or skip the decision cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("action index {0} is outside the action enumeration")]
    InvalidAction(usize),
    #[error("target {index} requested but only {len} targets generated")]
    NoTarget { index: usize, len: usize },
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(&'static str),
    #[error("learn called without a preceding choose_action in this cycle")]
    NoCachedVector,
}
