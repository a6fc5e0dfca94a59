use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    P1,
    P2,
}

impl Phase {
    pub fn other(&self) -> Phase {
        match self {
            Phase::P1 => Phase::P2,
            Phase::P2 => Phase::P1,
        }
    }
}

/// Who the server is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextUp {
    Team { team: Team },
    Phase { phase: Phase },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Won { winner: Team },
    Tie,
    InProgress { next: NextUp },
}

impl GameState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, GameState::InProgress { .. })
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Won { winner } => write!(f, "{} won", winner),
            GameState::Tie => write!(f, "tie"),
            GameState::InProgress {
                next: NextUp::Team { team },
            } => write!(f, "in progress, {} to play", team),
            GameState::InProgress {
                next: NextUp::Phase { phase },
            } => write!(f, "in progress, phase {:?}", phase),
        }
    }
}
