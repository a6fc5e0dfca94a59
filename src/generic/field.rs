use crate::Team;
use serde::{Deserialize, Serialize};

pub const BLOCKED_MARKER: &str = "yellow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Vacant,
    Owned { team: Team },
    /// a failed first attempt locks the cell for the rest of the game
    Blocked,
}

impl Field {
    pub fn marker(&self) -> &'static str {
        match self {
            Field::Vacant => "",
            Field::Owned { team } => team.marker(),
            Field::Blocked => BLOCKED_MARKER,
        }
    }

    pub fn owner(&self) -> Option<Team> {
        match self {
            Field::Owned { team } => Some(*team),
            _ => None,
        }
    }
}
