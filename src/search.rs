//! A depth-limited lookahead agent for choosing computer moves

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::time::Instant;

use crate::{Board, Player, DEFAULT_PLY};

/// The score of a single column from the searching player's point of view
pub type Score = f64;

/// One score per column, in column order
pub type ScoreVector = Vec<Score>;

/// The score of a position the searching player has already won
pub const WIN_SCORE: Score = 100.0;
/// The score of a position the opponent has already won
pub const LOSS_SCORE: Score = 0.0;
/// The score of an undecided position, or one the search cannot see past
pub const NEUTRAL_SCORE: Score = 50.0;
/// The score given to a full column, below any playable outcome
pub const FULL_COLUMN_SCORE: Score = -1.0;

/// How to pick between columns that share the best score
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TieBreakPolicy {
    Leftmost,
    Rightmost,
    UniformRandom,
}

impl fmt::Display for TieBreakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TieBreakPolicy::Leftmost => "left",
            TieBreakPolicy::Rightmost => "right",
            TieBreakPolicy::UniformRandom => "random",
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("unknown tie-break policy '{0}', expected one of 'left', 'right' or 'random'")]
pub struct ParseTieBreakError(String);

impl FromStr for TieBreakPolicy {
    type Err = ParseTieBreakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "leftmost" => Ok(TieBreakPolicy::Leftmost),
            "right" | "rightmost" => Ok(TieBreakPolicy::Rightmost),
            "random" | "uniform" | "uniformrandom" => Ok(TieBreakPolicy::UniformRandom),
            _ => Err(ParseTieBreakError(s.to_string())),
        }
    }
}

/// Returned when asked for a move on a board with no playable column
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
#[error("no legal move, every column is full")]
pub struct NoLegalMove;

/// The parameters of a single search
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchConfig {
    /// The player the search chooses a move for
    pub player: Player,
    pub tie_break: TieBreakPolicy,
    /// How many moves ahead to look. The search visits on the order of
    /// `columns ^ ply` positions, so this trades move quality for latency.
    pub ply: u32,
}

impl SearchConfig {
    pub fn new(player: Player, tie_break: TieBreakPolicy, ply: u32) -> Self {
        Self {
            player,
            tie_break,
            ply,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Player::Two, TieBreakPolicy::UniformRandom, DEFAULT_PLY)
    }
}

/// Scores the current position for `player`
///
/// Returns [`WIN_SCORE`] if `player` has a winning line, [`LOSS_SCORE`] if the
/// opponent does and [`NEUTRAL_SCORE`] otherwise.
///
/// [`WIN_SCORE`]: constant.WIN_SCORE.html
/// [`LOSS_SCORE`]: constant.LOSS_SCORE.html
/// [`NEUTRAL_SCORE`]: constant.NEUTRAL_SCORE.html
pub fn evaluate_terminal(board: &Board, player: Player) -> Score {
    if board.wins_for(player) {
        WIN_SCORE
    } else if board.wins_for(player.other()) {
        LOSS_SCORE
    } else {
        NEUTRAL_SCORE
    }
}

/// Scores every column of `board` for `config.player`, see [`Searcher::score_columns`]
///
/// [`Searcher::score_columns`]: struct.Searcher.html#method.score_columns
pub fn score_columns(board: &mut Board, config: &SearchConfig) -> ScoreVector {
    Searcher::new(*config).score_columns(board)
}

/// Picks a column for `config.player`, see [`Searcher::choose_column`]
///
/// [`Searcher::choose_column`]: struct.Searcher.html#method.choose_column
pub fn choose_column(board: &mut Board, config: &SearchConfig) -> Result<usize, NoLegalMove> {
    Searcher::new(*config).choose_column(board)
}

/// Picks the column to play from a score vector according to `tie_break`
///
/// Only playable columns (scored above [`FULL_COLUMN_SCORE`]) are considered.
///
/// [`FULL_COLUMN_SCORE`]: constant.FULL_COLUMN_SCORE.html
pub fn break_tie<R: Rng + ?Sized>(
    scores: &[Score],
    tie_break: TieBreakPolicy,
    rng: &mut R,
) -> Result<usize, NoLegalMove> {
    let best = scores
        .iter()
        .copied()
        .filter(|&score| score > FULL_COLUMN_SCORE)
        .fold(None, |best: Option<Score>, score| match best {
            Some(best) if best >= score => Some(best),
            _ => Some(score),
        })
        .ok_or(NoLegalMove)?;

    let mut ties = scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score == best)
        .map(|(column, _)| column);

    let chosen = match tie_break {
        TieBreakPolicy::Leftmost => ties.next(),
        TieBreakPolicy::Rightmost => ties.last(),
        TieBreakPolicy::UniformRandom => {
            let ties: Vec<usize> = ties.collect();
            ties.choose(rng).copied()
        }
    };
    chosen.ok_or(NoLegalMove)
}

// Plays a tile for the duration of a borrow and takes it back when dropped,
// including during unwinding.
struct SimulatedMove<'a> {
    board: &'a mut Board,
    column: usize,
}

impl<'a> SimulatedMove<'a> {
    fn play(board: &'a mut Board, column: usize, player: Player) -> Self {
        if let Err(err) = board.place(column, player) {
            panic!("search simulated an illegal move: {}", err);
        }
        Self { board, column }
    }
}

impl Deref for SimulatedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for SimulatedMove<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for SimulatedMove<'_> {
    fn drop(&mut self) {
        self.board.remove_top(self.column);
    }
}

/// An agent that scores moves by looking a fixed number of moves ahead
///
/// # Notes
/// Every playable column is tried in turn. A move that wins outright scores
/// [`WIN_SCORE`]. Otherwise the opponent's best reply is found by the same rule
/// one ply shallower, and the move scores `WIN_SCORE` minus that reply's score,
/// since a good position for the opponent is a bad one for the mover. There is no
/// pruning, so every line up to `ply` moves deep is visited.
///
/// Moves are simulated on the caller's board and always taken back, so the
/// board is identical before and after every call.
///
/// [`WIN_SCORE`]: constant.WIN_SCORE.html
#[derive(Clone, Debug)]
pub struct Searcher {
    config: SearchConfig,

    /// The number of positions searched by this `Searcher` so far (for diagnostics only)
    pub node_count: usize,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            node_count: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns one score per column for the configured player
    ///
    /// Full columns score [`FULL_COLUMN_SCORE`]. If either player has already won,
    /// every other column scores [`evaluate_terminal`] of the current board. With no
    /// lookahead left, every other column scores [`NEUTRAL_SCORE`].
    ///
    /// [`FULL_COLUMN_SCORE`]: constant.FULL_COLUMN_SCORE.html
    /// [`evaluate_terminal`]: fn.evaluate_terminal.html
    /// [`NEUTRAL_SCORE`]: constant.NEUTRAL_SCORE.html
    pub fn score_columns(&mut self, board: &mut Board) -> ScoreVector {
        let SearchConfig { player, ply, .. } = self.config;
        let terminal = self.terminal_score(board, player);
        (0..board.column_count())
            .map(|column| self.score_column(board, player, ply, column, terminal))
            .collect()
    }

    /// Chooses a column for the configured player using the thread-local RNG
    pub fn choose_column(&mut self, board: &mut Board) -> Result<usize, NoLegalMove> {
        self._choose_column(board, &mut rand::thread_rng(), true)
    }

    /// Chooses a column for the configured player, logging the scores to stdout
    pub fn choose_column_verbose(&mut self, board: &mut Board) -> Result<usize, NoLegalMove> {
        self._choose_column(board, &mut rand::thread_rng(), false)
    }

    /// Chooses a column for the configured player, drawing random tie-breaks from `rng`
    pub fn choose_column_with_rng<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        rng: &mut R,
    ) -> Result<usize, NoLegalMove> {
        self._choose_column(board, rng, true)
    }

    fn _choose_column<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        rng: &mut R,
        silent: bool,
    ) -> Result<usize, NoLegalMove> {
        let start_time = Instant::now();
        let start_nodes = self.node_count;

        let scores = self.score_columns(board);
        let chosen = break_tie(&scores, self.config.tie_break, rng);

        if !silent {
            let scores: Vec<String> = scores.iter().map(|score| format!("{:.1}", score)).collect();
            println!(
                "{} scores (ply {}): [{}]",
                self.config.player,
                self.config.ply,
                scores.join(", ")
            );
            let time = start_time.elapsed();
            let nodes = self.node_count - start_nodes;
            println!(
                "Searched {} positions in {:.3}ms, kpos/s: {:.1}",
                nodes,
                time.as_secs_f64() * 1000.0,
                nodes as f64 / (1000.0 * time.as_secs_f64().max(f64::EPSILON))
            );
        }
        chosen
    }

    // the score of an already decided position, or None if nobody has won yet
    fn terminal_score(&self, board: &Board, player: Player) -> Option<Score> {
        if board.wins_for(player) || board.wins_for(player.other()) {
            Some(evaluate_terminal(board, player))
        } else {
            None
        }
    }

    fn score_column(
        &mut self,
        board: &mut Board,
        player: Player,
        ply: u32,
        column: usize,
        terminal: Option<Score>,
    ) -> Score {
        if board.is_column_full(column) {
            return FULL_COLUMN_SCORE;
        }
        // a decided position scores the same whichever column is tried
        if let Some(score) = terminal {
            return score;
        }
        if ply == 0 {
            return NEUTRAL_SCORE;
        }

        self.node_count += 1;
        let mut next = SimulatedMove::play(board, column, player);
        if next.wins_for(player) {
            return WIN_SCORE;
        }
        // nobody can move after a board-filling move, so it ends in a draw
        if next.is_full() {
            return NEUTRAL_SCORE;
        }
        WIN_SCORE - self.best_score(&mut next, player.other(), ply - 1)
    }

    // the best score `player` can reach from here, the maximum of their score vector
    fn best_score(&mut self, board: &mut Board, player: Player, ply: u32) -> Score {
        // same short-circuit as score_columns
        let terminal = self.terminal_score(board, player);
        (0..board.column_count())
            .map(|column| self.score_column(board, player, ply, column, terminal))
            .fold(FULL_COLUMN_SCORE, Score::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn parse_tie_break() {
        assert_eq!("left".parse(), Ok(TieBreakPolicy::Leftmost));
        assert_eq!("RIGHTMOST".parse(), Ok(TieBreakPolicy::Rightmost));
        assert_eq!("Random".parse(), Ok(TieBreakPolicy::UniformRandom));
        assert!("middle".parse::<TieBreakPolicy>().is_err());
    }

    #[test]
    fn tie_break_display_round_trips() {
        for &policy in &[
            TieBreakPolicy::Leftmost,
            TieBreakPolicy::Rightmost,
            TieBreakPolicy::UniformRandom,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }

    #[test]
    fn break_tie_policies() {
        let scores = [FULL_COLUMN_SCORE, 50.0, 100.0, 0.0, 100.0, FULL_COLUMN_SCORE];
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(break_tie(&scores, TieBreakPolicy::Leftmost, &mut rng), Ok(2));
        assert_eq!(break_tie(&scores, TieBreakPolicy::Rightmost, &mut rng), Ok(4));
        for _ in 0..20 {
            let column = break_tie(&scores, TieBreakPolicy::UniformRandom, &mut rng).unwrap();
            assert!(column == 2 || column == 4);
        }
    }

    #[test]
    fn break_tie_all_full() {
        let scores = [FULL_COLUMN_SCORE; 4];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            break_tie(&scores, TieBreakPolicy::Leftmost, &mut rng),
            Err(NoLegalMove)
        );
    }

    #[test]
    fn evaluate_terminal_scores() {
        let undecided = Board::from_moves(6, 7, 4, &[0, 1, 0]);
        assert_eq!(evaluate_terminal(&undecided, Player::One), NEUTRAL_SCORE);

        let won = Board::from_moves(6, 7, 4, &[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(evaluate_terminal(&won, Player::One), WIN_SCORE);
        assert_eq!(evaluate_terminal(&won, Player::Two), LOSS_SCORE);
    }

    #[test]
    fn takes_an_immediate_win() {
        // Player Two has three stacked in column 1
        let mut board = Board::from_moves(6, 7, 4, &[0, 1, 2, 1, 4, 1, 6]);
        let config = SearchConfig::new(Player::Two, TieBreakPolicy::Leftmost, 1);

        let scores = score_columns(&mut board, &config);
        assert_eq!(scores[1], WIN_SCORE);
        assert_eq!(choose_column(&mut board, &config), Ok(1));
    }

    #[test]
    fn blocks_an_immediate_loss() {
        // Player One threatens to complete the bottom row at column 3
        let mut board = Board::from_moves(6, 7, 4, &[0, 6, 1, 6, 2]);
        let config = SearchConfig::new(Player::Two, TieBreakPolicy::Leftmost, 2);

        let scores = score_columns(&mut board, &config);
        assert_eq!(scores[3], NEUTRAL_SCORE);
        for (column, &score) in scores.iter().enumerate() {
            if column != 3 {
                assert_eq!(score, LOSS_SCORE, "column {}", column);
            }
        }
        assert_eq!(choose_column(&mut board, &config), Ok(3));
    }

    #[test]
    fn board_filling_move_scores_as_draw() {
        // 1 2 .
        // 1 2 2
        // 2 1 1
        let mut board = Board::new(3, 3, 3);
        for &(column, player) in &[
            (0, Player::Two),
            (0, Player::One),
            (0, Player::One),
            (1, Player::One),
            (1, Player::Two),
            (1, Player::Two),
            (2, Player::One),
            (2, Player::Two),
        ] {
            board.place(column, player).unwrap();
        }
        assert!(!board.wins_for(Player::One));
        assert!(!board.wins_for(Player::Two));

        let config = SearchConfig::new(Player::One, TieBreakPolicy::Leftmost, 3);
        let scores = score_columns(&mut board, &config);
        assert_eq!(scores, vec![FULL_COLUMN_SCORE, FULL_COLUMN_SCORE, NEUTRAL_SCORE]);
        assert_eq!(choose_column(&mut board, &config), Ok(2));
    }

    #[test]
    fn node_count_grows_with_ply() {
        let mut board = Board::new(4, 4, 3);
        let mut shallow = Searcher::new(SearchConfig::new(Player::One, TieBreakPolicy::Leftmost, 1));
        let mut deep = Searcher::new(SearchConfig::new(Player::One, TieBreakPolicy::Leftmost, 3));
        shallow.score_columns(&mut board);
        deep.score_columns(&mut board);

        assert_eq!(shallow.node_count, 4);
        assert!(deep.node_count > shallow.node_count);
    }
}
