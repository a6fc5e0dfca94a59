pub mod boards;
mod claim;
mod field;
mod game_mode;
mod gamestate;
mod judge;
mod snapshot;
mod team;

pub use boards::{check_matrix, Board, CellState};
pub use claim::{Claim, ClaimOutcome, ClaimRequest, Coordinates, InvalidClaim};
pub use field::{Field, BLOCKED_MARKER};
pub use game_mode::{GameMode, InvalidPlayerCount};
pub use gamestate::{GameState, NextUp, Phase};
pub use judge::{Judge, SharedJudge, TrustingJudge, Verdict, CHALLENGE_TEXT};
pub use snapshot::{GameView, GridSnapshot};
pub use team::Team;
