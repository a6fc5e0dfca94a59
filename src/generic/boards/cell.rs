use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ClaimOutcome, Field, InvalidClaim, Team, Verdict};

/// Bookkeeping the server keeps for a single cell on top of what is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellState {
    pub field: Field,
    /// the team that captured the cell while it was still vacant
    pub first_solver: Option<Team>,
    pub failed: BTreeSet<Team>,
}

impl Default for CellState {
    fn default() -> Self {
        Self::new()
    }
}

impl CellState {
    pub fn new() -> Self {
        Self {
            field: Field::Vacant,
            first_solver: None,
            failed: BTreeSet::new(),
        }
    }

    /// Checks whether `team` may attempt this cell at all.
    pub fn check_attempt(&self, team: Team) -> Result<(), InvalidClaim> {
        match self.field {
            Field::Blocked => Err(InvalidClaim::CellBlocked),
            Field::Owned { .. } if self.first_solver == Some(team) => {
                Err(InvalidClaim::FirstSolver)
            }
            _ if self.failed.contains(&team) => Err(InvalidClaim::AlreadyFailed),
            Field::Owned { team: owner } if owner == team => Err(InvalidClaim::AlreadyOwned),
            _ => Ok(()),
        }
    }

    /// Applies a verdict for `team`. The attempt must have passed `check_attempt`.
    pub fn apply(&mut self, team: Team, verdict: &Verdict) -> ClaimOutcome {
        match verdict {
            Verdict::Solved => {
                if self.field == Field::Vacant {
                    self.first_solver = Some(team);
                }
                self.field = Field::Owned { team };
                ClaimOutcome::Captured
            }
            Verdict::Failed { reason } => {
                self.failed.insert(team);
                if self.field == Field::Vacant {
                    self.field = Field::Blocked;
                }
                ClaimOutcome::Failed {
                    reason: reason.clone(),
                }
            }
        }
    }
}
