use itertools::Itertools;
use ndarray::Array2;

use crate::{Coordinates, Field, GameState, NextUp, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct WinnerRegisterer {
    winner: Option<Team>,
}
impl WinnerRegisterer {
    pub fn register(&mut self, team: Option<Team>) {
        if self.winner.is_none() && team.is_some() {
            self.winner = team;
        }
    }
    pub fn get_winner(&self) -> Option<Team> {
        self.winner
    }
}

/// Returns every row, column and diagonal (in both directions) of a square
/// grid of the given size, as lists of coordinates.
///
/// Diagonals shorter than the grid are included, so runs that do not start
/// in a corner are found as well.
pub fn lines(size: usize) -> Vec<Vec<Coordinates>> {
    let mut lines = Vec::new();

    for row in 0..size {
        lines.push((0..size).map(|col| (row, col)).collect());
    }
    for col in 0..size {
        lines.push((0..size).map(|row| (row, col)).collect());
    }

    // top-left to bottom-right, starting on the top row or the left column
    let starts = (0..size).map(|col| (0, col)).chain((1..size).map(|row| (row, 0)));
    for (row, col) in starts {
        lines.push(
            (0..size)
                .map(|step| (row + step, col + step))
                .take_while(|&(r, c)| r < size && c < size)
                .collect(),
        );
    }

    // top-right to bottom-left, starting on the top row or the right column
    let starts = (0..size)
        .map(|col| (0, col))
        .chain((1..size).map(|row| (row, size - 1)));
    for (row, col) in starts {
        lines.push(
            (0..size)
                .map_while(|step| Some((row + step, col.checked_sub(step)?)))
                .take_while(|&(r, _)| r < size)
                .collect(),
        );
    }

    lines
}

fn has_run(matrix: &Array2<Field>, team: Team, win_count: usize) -> bool {
    let owned = Field::Owned { team };
    lines(matrix.nrows()).iter().any(|line| {
        line.iter()
            .map(|coordinates| matrix[*coordinates])
            .dedup_with_count()
            .any(|(count, field)| field == owned && count >= win_count)
    })
}

/// Returns the first team, in `Team::ALL` order, that owns `win_count`
/// consecutive cells in a row, column or diagonal.
pub fn check_winner(matrix: &Array2<Field>, win_count: usize) -> Option<Team> {
    let mut winner_registerer = WinnerRegisterer::default();
    for team in Team::ALL {
        if has_run(matrix, team, win_count) {
            winner_registerer.register(Some(team));
        }
    }
    winner_registerer.get_winner()
}

/// A game is tied once every window of `win_count` consecutive cells contains
/// a blocked cell: owned cells can still change hands, blocked ones can't.
pub fn is_tie(matrix: &Array2<Field>, win_count: usize) -> bool {
    if win_count == 0 {
        return false;
    }
    !lines(matrix.nrows()).iter().any(|line| {
        line.windows(win_count).any(|window| {
            window
                .iter()
                .all(|coordinates| matrix[*coordinates] != Field::Blocked)
        })
    })
}

/// Checks a matrix of fields for a winner or a tie.
///
/// Usage:
/// ```
/// use ndarray::array;
/// use code_grid::{check_matrix, Field, GameState, NextUp, Team};
///
/// let red = Field::Owned { team: Team::Red };
/// let blue = Field::Owned { team: Team::Blue };
///
/// // red  blue  .
/// // red  blue  .
/// // red  .     .   <-- red wins
/// let matrix = array![
///     [red, blue, Field::Vacant],
///     [red, blue, Field::Vacant],
///     [red, Field::Vacant, Field::Vacant],
/// ];
///
/// let next = NextUp::Team { team: Team::Blue };
/// assert_eq!(check_matrix(&matrix, 3, next), GameState::Won { winner: Team::Red });
/// ```
pub fn check_matrix(matrix: &Array2<Field>, win_count: usize, next: NextUp) -> GameState {
    if let Some(winner) = check_winner(matrix, win_count) {
        GameState::Won { winner }
    } else if is_tie(matrix, win_count) {
        GameState::Tie
    } else {
        GameState::InProgress { next }
    }
}
