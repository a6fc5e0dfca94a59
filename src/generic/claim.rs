use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Team;

pub type Coordinates = (usize, usize);

/// A claim as it travels over the wire. Coordinates are kept as the strings
/// read from the cell's attributes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClaimRequest {
    pub row: String,
    pub col: String,
    pub team: String,
    pub code: String,
}

impl ClaimRequest {
    pub fn new(row: impl Into<String>, col: impl Into<String>, team: &str, code: String) -> Self {
        Self {
            row: row.into(),
            col: col.into(),
            team: team.to_string(),
            code,
        }
    }
}

/// A parsed claim, ready to be checked against a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub coordinates: Coordinates,
    pub team: Team,
    pub code: String,
}

impl Claim {
    pub fn new(coordinates: Coordinates, team: Team, code: impl Into<String>) -> Self {
        Self {
            coordinates,
            team,
            code: code.into(),
        }
    }
}

impl TryFrom<ClaimRequest> for Claim {
    type Error = InvalidClaim;

    fn try_from(request: ClaimRequest) -> Result<Self, Self::Error> {
        let parse = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| InvalidClaim::MalformedCoordinates(value.to_string()))
        };
        let row = parse(&request.row)?;
        let col = parse(&request.col)?;
        let team = request
            .team
            .parse::<Team>()
            .map_err(|_| InvalidClaim::UnknownTeam(request.team.clone()))?;
        Ok(Claim::new((row, col), team, request.code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidClaim {
    MalformedCoordinates(String),
    UnknownTeam(String),
    OutOfBounds,
    GameEnded,
    CellBlocked,
    FirstSolver,
    AlreadyFailed,
    AlreadyOwned,
}

impl Display for InvalidClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidClaim::MalformedCoordinates(value) => {
                write!(f, "malformed coordinate: {:?}", value)
            }
            InvalidClaim::UnknownTeam(team) => write!(f, "unknown team: {:?}", team),
            InvalidClaim::OutOfBounds => write!(f, "the cell is outside the grid"),
            InvalidClaim::GameEnded => write!(f, "the game is over"),
            InvalidClaim::CellBlocked => write!(f, "the cell is blocked, no attempt possible"),
            InvalidClaim::FirstSolver => {
                write!(f, "you cannot retry a cell you were the first to win")
            }
            InvalidClaim::AlreadyFailed => {
                write!(f, "you already tried to capture this cell and failed")
            }
            InvalidClaim::AlreadyOwned => write!(f, "you already own this cell"),
        }
    }
}

/// What happened to an accepted claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcome {
    Captured,
    Failed { reason: String },
    /// queued until the other team submits its move for the current phase
    Pending,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_claim_request() {
        let request = ClaimRequest::new("1", "2", "red", "addition(2,3)".to_string());
        assert_eq!(
            Claim::try_from(request),
            Ok(Claim::new((1, 2), Team::Red, "addition(2,3)"))
        );
    }

    #[test]
    fn reject_malformed_claim_request() {
        let request = ClaimRequest::new("one", "2", "red", String::new());
        assert_eq!(
            Claim::try_from(request),
            Err(InvalidClaim::MalformedCoordinates("one".to_string()))
        );

        let request = ClaimRequest::new("-1", "2", "red", String::new());
        assert!(matches!(
            Claim::try_from(request),
            Err(InvalidClaim::MalformedCoordinates(_))
        ));

        let request = ClaimRequest::new("0", "0", "green", String::new());
        assert_eq!(
            Claim::try_from(request),
            Err(InvalidClaim::UnknownTeam("green".to_string()))
        );
    }

    #[test]
    fn claim_request_wire_format() {
        let request = ClaimRequest::new("1", "1", "red", "addition(2,3)".to_string());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"row": "1", "col": "1", "team": "red", "code": "addition(2,3)"})
        );
    }
}
