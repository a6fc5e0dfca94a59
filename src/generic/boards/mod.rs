mod board;
mod cell;
mod matrix_checker;

pub use board::Board;
pub use cell::CellState;
pub use matrix_checker::{check_matrix, check_winner, is_tie, lines};
