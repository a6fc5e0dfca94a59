use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// two players taking turns on a 3x3 grid
    Duel,
    /// two players per team playing simultaneous phases on a 5x5 grid
    Teams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidPlayerCount(pub usize);

impl ToString for InvalidPlayerCount {
    fn to_string(&self) -> String {
        format!("invalid number of players: {}, choose 2 or 4", self.0)
    }
}

impl GameMode {
    pub fn from_player_count(players: usize) -> Result<Self, InvalidPlayerCount> {
        match players {
            2 => Ok(GameMode::Duel),
            4 => Ok(GameMode::Teams),
            other => Err(InvalidPlayerCount(other)),
        }
    }

    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Duel => 2,
            GameMode::Teams => 4,
        }
    }

    pub fn grid_size(&self) -> usize {
        match self {
            GameMode::Duel => 3,
            GameMode::Teams => 5,
        }
    }

    /// number of consecutive cells a team needs to win
    pub fn win_count(&self) -> usize {
        self.grid_size()
    }
}
