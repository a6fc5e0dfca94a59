use serde::{Deserialize, Serialize};

use crate::{GameMode, GameState};

/// The full grid as pushed to clients, indexed `grid[row][col]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct GridSnapshot {
    pub grid: Vec<Vec<String>>,
}

impl GridSnapshot {
    pub fn new(grid: Vec<Vec<String>>) -> Self {
        Self { grid }
    }

    pub fn empty(size: usize) -> Self {
        Self {
            grid: vec![vec![String::new(); size]; size],
        }
    }

    pub fn marker(&self, row: usize, col: usize) -> Option<&str> {
        self.grid
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
    }
}

/// Everything a subscriber gets to know about a game.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameView {
    #[serde(flatten)]
    pub snapshot: GridSnapshot,
    pub grid_size: usize,
    pub mode: GameMode,
    pub state: GameState,
    pub turn: u32,
}
