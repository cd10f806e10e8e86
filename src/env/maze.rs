use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::env::{MazeAction, State};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: i64,
    pub col: i64,
}

impl GridPos {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Free,
    Start,
    Goal,
}

/// Transition classification for the maze variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeEvent {
    Blocked,
    ReachedGoal,
    NormalStep,
    InvalidMove,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeRewardTable {
    pub invalid_move: f64,
    pub blocked: f64,
    pub step: f64,
    pub goal: f64,
}

impl Default for MazeRewardTable {
    fn default() -> Self {
        Self {
            invalid_move: -60.0,
            blocked: -6.0,
            step: -1.0,
            goal: 60.0,
        }
    }
}

type CellMap = IndexMap<GridPos, Cell, FxBuildHasher>;

/// Grid world parsed from a text map: `#` wall, `.` start, `*` goal,
/// space free. Cells are kept in row-major insertion order.
///
/// Walls are not solid: stepping into one moves the agent and costs the
/// `blocked` penalty. Only off-map moves leave the agent in place.
#[derive(Debug, Clone)]
pub struct MazeEnv {
    cells: CellMap,
    width: usize,
    height: usize,
    start: GridPos,
    goal: GridPos,
    rewards: MazeRewardTable,
}

impl MazeEnv {
    pub fn parse(text: &str, rewards: MazeRewardTable) -> Result<Self, CoreError> {
        let lines: Vec<&str> = text.trim().lines().collect();
        if lines.is_empty() || lines[0].is_empty() {
            return Err(CoreError::DegenerateConfiguration("empty maze text"));
        }
        let height = lines.len();
        let width = lines[0].chars().count();

        let mut cells =
            CellMap::with_capacity_and_hasher(width * height, FxBuildHasher::default());
        let mut start = None;
        let mut goal = None;
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let pos = GridPos::new(row as i64, col as i64);
                let cell = match ch {
                    '#' => Cell::Wall,
                    '.' => {
                        start = Some(pos);
                        Cell::Start
                    }
                    '*' => {
                        goal = Some(pos);
                        Cell::Goal
                    }
                    _ => Cell::Free,
                };
                cells.insert(pos, cell);
            }
        }

        let start = start.ok_or(CoreError::DegenerateConfiguration(
            "maze has no starting point",
        ))?;
        let goal = goal.ok_or(CoreError::DegenerateConfiguration("maze has no goal"))?;
        Ok(Self {
            cells,
            width,
            height,
            start,
            goal,
            rewards,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn starting_point(&self) -> GridPos {
        self.start
    }

    pub fn goal(&self) -> GridPos {
        self.goal
    }

    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        self.cells.get(&pos).copied()
    }

    pub fn is_goal(&self, pos: GridPos) -> bool {
        pos == self.goal
    }

    /// Apply one action to a position and classify the transition.
    pub fn apply(&self, pos: GridPos, action: MazeAction) -> (GridPos, MazeEvent) {
        let candidate = match action {
            MazeAction::Up => GridPos::new(pos.row - 1, pos.col),
            MazeAction::Down => GridPos::new(pos.row + 1, pos.col),
            MazeAction::Left => GridPos::new(pos.row, pos.col - 1),
            MazeAction::Right => GridPos::new(pos.row, pos.col + 1),
        };

        match self.cells.get(&candidate) {
            Some(Cell::Wall) | Some(Cell::Start) => (candidate, MazeEvent::Blocked),
            Some(Cell::Goal) => (candidate, MazeEvent::ReachedGoal),
            Some(_) => (candidate, MazeEvent::NormalStep),
            None => {
                tracing::trace!(?pos, ?action, "off-map move rejected");
                (pos, MazeEvent::InvalidMove)
            }
        }
    }

    pub fn reward(&self, event: MazeEvent) -> f64 {
        match event {
            MazeEvent::Blocked => self.rewards.blocked,
            MazeEvent::ReachedGoal => self.rewards.goal,
            MazeEvent::NormalStep => self.rewards.step,
            MazeEvent::InvalidMove => self.rewards.invalid_move,
        }
    }

    /// Normalized `(row / height, col / width)`.
    pub fn observe(&self, pos: GridPos) -> State {
        State(
            pos.row as f64 / self.height as f64,
            pos.col as f64 / self.width as f64,
        )
    }
}
