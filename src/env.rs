mod action;
mod maze;
mod platformer;
mod state;

pub use action::{DiscreteAction, JumpAction, MazeAction};
pub use maze::{Cell, GridPos, MazeEnv, MazeEvent, MazeRewardTable};
pub use platformer::{
    shaped_idle_penalty, JumpEvent, JumpRewardTable, JumpStateSpace, PlatformTrack,
};
pub use state::State;
