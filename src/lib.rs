//! A computer opponent for 'Connect N', the gravity-drop connection game
//! played on a board of any size with any winning line length
//!
//! The agent looks a fixed number of moves ahead, trying every column for
//! itself and then for its opponent, and picks the column with the best
//! outcome it can see.
//!
//! # Basic Usage
//!
//! ```
//! use connectn_ai::{Board, Player, SearchConfig, TieBreakPolicy, choose_column};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // Player One has three along the bottom row
//! let mut board = Board::from_moves(6, 7, 4, &[0, 0, 1, 1, 2]);
//! let config = SearchConfig::new(Player::Two, TieBreakPolicy::Leftmost, 2);
//!
//! let column = choose_column(&mut board, &config)?;
//! assert_eq!(column, 3);
//!
//! board.place(column, Player::Two)?;
//! assert!(!board.wins_for(Player::One));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;

pub mod board;

pub mod search;


pub use board::{Board, Cell, IllegalMove, Player};
pub use search::{
    choose_column, evaluate_terminal, score_columns, NoLegalMove, Score, ScoreVector,
    SearchConfig, Searcher, TieBreakPolicy,
};

/// The number of rows on a standard board
pub const DEFAULT_ROWS: usize = 6;

/// The number of columns on a standard board
pub const DEFAULT_COLUMNS: usize = 7;

/// The number of tiles in a row needed to win on a standard board
pub const DEFAULT_CONNECT_LENGTH: usize = 4;

/// The default lookahead of the computer player
pub const DEFAULT_PLY: u32 = 5;

// ensure the standard board satisfies the board preconditions
const_assert!(DEFAULT_CONNECT_LENGTH >= 2);
const_assert!(DEFAULT_ROWS >= DEFAULT_CONNECT_LENGTH);
const_assert!(DEFAULT_COLUMNS >= DEFAULT_CONNECT_LENGTH);
