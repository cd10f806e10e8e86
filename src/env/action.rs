use crate::error::CoreError;

/// A member of a fixed, small action enumeration.
///
/// The declared order of the variants is the index order into the
/// action-value vector. That ordering is part of the contract between the
/// approximator and its callers, not incidental.
pub trait DiscreteAction:
    Copy + Into<usize> + TryFrom<usize, Error = CoreError> + std::fmt::Debug
{
    const COUNT: usize;
}

/// Platformer actions, in action-value index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpAction {
    None,
    Left,
    Right,
}

impl DiscreteAction for JumpAction {
    const COUNT: usize = 3;
}

impl From<JumpAction> for usize {
    fn from(action: JumpAction) -> usize {
        match action {
            JumpAction::None => 0,
            JumpAction::Left => 1,
            JumpAction::Right => 2,
        }
    }
}

impl TryFrom<usize> for JumpAction {
    type Error = CoreError;

    fn try_from(index: usize) -> Result<Self, CoreError> {
        match index {
            0 => Ok(JumpAction::None),
            1 => Ok(JumpAction::Left),
            2 => Ok(JumpAction::Right),
            _ => Err(CoreError::InvalidAction(index)),
        }
    }
}

/// Maze-variant actions, in action-value index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeAction {
    Up,
    Down,
    Left,
    Right,
}

impl DiscreteAction for MazeAction {
    const COUNT: usize = 4;
}

impl From<MazeAction> for usize {
    fn from(action: MazeAction) -> usize {
        match action {
            MazeAction::Up => 0,
            MazeAction::Down => 1,
            MazeAction::Left => 2,
            MazeAction::Right => 3,
        }
    }
}

impl TryFrom<usize> for MazeAction {
    type Error = CoreError;

    fn try_from(index: usize) -> Result<Self, CoreError> {
        match index {
            0 => Ok(MazeAction::Up),
            1 => Ok(MazeAction::Down),
            2 => Ok(MazeAction::Left),
            3 => Ok(MazeAction::Right),
            _ => Err(CoreError::InvalidAction(index)),
        }
    }
}
