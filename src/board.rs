//! A gravity-drop game board of arbitrary size and win length

use thiserror::Error;

use std::fmt;

/// One of the two sides of a game
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Returns the opposing player
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The player's number as shown to humans, 1 or 2
    pub fn number(self) -> usize {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Cell {
    Empty,
    Owned(Player),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns true if the cell holds a tile belonging to `player`
    pub fn is(&self, player: Player) -> bool {
        *self == Cell::Owned(player)
    }
}

/// Reasons a placement can be rejected
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum IllegalMove {
    #[error("Invalid move, column {column} out of range. Columns must be less than {columns}")]
    OutOfRange { column: usize, columns: usize },
    #[error("Invalid move, column {column} full")]
    ColumnFull { column: usize },
}

// (row step, column step) for each axis a line can run along. Rows count
// downwards from the top, so walking "down" a diagonal is the same line as
// walking "up" it from the other end.
const AXES: [(usize, isize); 4] = [
    // horizontal
    (0, 1),
    // vertical
    (1, 0),
    // diagonal rising to the left
    (1, 1),
    // diagonal rising to the right
    (1, -1),
];

/// A game board with gravity-drop placement
///
/// # Preconditions
/// `connect_length >= 2` and `rows, columns >= connect_length`. These are not
/// checked here, the caller is responsible for constructing a sensible board.
///
/// # Layout
/// Row 0 is the top row and row `rows - 1` the bottom row. Within each column the
/// occupied cells always form one contiguous run starting at the bottom row.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    connect_length: usize,
    // cells are stored row by row, top row first
    cells: Vec<Cell>,
    // number of tiles in each column
    heights: Vec<usize>,
}

impl Board {
    /// Creates an empty board
    pub fn new(rows: usize, columns: usize, connect_length: usize) -> Self {
        Self {
            rows,
            columns,
            connect_length,
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
        }
    }

    /// Creates a board by replaying `moves` with [`load_from_move_sequence`]
    ///
    /// [`load_from_move_sequence`]: #method.load_from_move_sequence
    pub fn from_moves(rows: usize, columns: usize, connect_length: usize, moves: &[usize]) -> Self {
        let mut board = Self::new(rows, columns, connect_length);
        board.load_from_move_sequence(moves);
        board
    }

    /// Replays alternating placements onto the board, Player One first
    ///
    /// Entries outside `[0, columns)` and entries into a full column are skipped,
    /// but still use up that player's turn.
    pub fn load_from_move_sequence(&mut self, moves: &[usize]) {
        let mut player = Player::One;
        for &column in moves {
            let _ = self.place(column, player);
            player = player.other();
        }
    }

    /// Replays a string of single-digit column numbers, see [`load_from_move_sequence`]
    ///
    /// Characters that are not digits count as skipped moves.
    ///
    /// [`load_from_move_sequence`]: #method.load_from_move_sequence
    pub fn load_from_move_string<S: AsRef<str>>(&mut self, moves: S) {
        let moves: Vec<usize> = moves
            .as_ref()
            .chars()
            .map(|c| c.to_digit(10).map_or(usize::MAX, |d| d as usize))
            .collect();
        self.load_from_move_sequence(&moves);
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn connect_length(&self) -> usize {
        self.connect_length
    }

    /// Returns the cell at `row` (0 is the top row) and `column`
    ///
    /// # Panics
    /// Panics if the position is off the board.
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({}, {}) is off the board",
            row,
            column
        );
        self.cells[self.index(row, column)]
    }

    fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Drops a tile for `player` into the lowest empty cell of `column`
    pub fn place(&mut self, column: usize, player: Player) -> Result<(), IllegalMove> {
        if column >= self.columns {
            return Err(IllegalMove::OutOfRange {
                column,
                columns: self.columns,
            });
        }
        if self.is_column_full(column) {
            return Err(IllegalMove::ColumnFull { column });
        }

        let row = self.rows - 1 - self.heights[column];
        let index = self.index(row, column);
        self.cells[index] = Cell::Owned(player);
        self.heights[column] += 1;
        Ok(())
    }

    /// Empties the highest occupied cell of `column`
    ///
    /// This exists to undo a [`place`] the caller has just made in the same column.
    /// Calling it on a column whose tiles the caller did not place, or on an empty
    /// column, breaks that contract and the resulting board state is unspecified.
    ///
    /// [`place`]: #method.place
    pub fn remove_top(&mut self, column: usize) {
        debug_assert!(
            self.heights[column] > 0,
            "remove_top called on empty column {}",
            column
        );
        let row = self.rows - self.heights[column];
        let index = self.index(row, column);
        self.cells[index] = Cell::Empty;
        self.heights[column] -= 1;
    }

    /// Returns true if the top cell of `column` is occupied
    pub fn is_column_full(&self, column: usize) -> bool {
        self.heights[column] >= self.rows
    }

    /// Returns true if every column is full
    pub fn is_full(&self) -> bool {
        (0..self.columns).all(|column| self.is_column_full(column))
    }

    /// Returns true if `player` has `connect_length` or more tiles in an unbroken
    /// line along any axis
    ///
    /// Runs in O(rows * columns * connect_length) without allocating.
    pub fn wins_for(&self, player: Player) -> bool {
        AXES.iter()
            .any(|&(row_step, column_step)| self.check_axis(player, row_step, column_step))
    }

    fn check_axis(&self, player: Player, row_step: usize, column_step: isize) -> bool {
        let reach = match self.connect_length.checked_sub(1) {
            Some(reach) => reach,
            None => return false,
        };

        // starting cells from which a full line still fits on the board
        let last_row = match self.rows.checked_sub(1 + row_step * reach) {
            Some(last_row) => last_row,
            None => return false,
        };
        let columns = match column_step {
            0 => 0..self.columns,
            1 => 0..self.columns.saturating_sub(reach),
            _ => reach..self.columns,
        };

        for row in 0..=last_row {
            for column in columns.clone() {
                if self.run_from(player, row, column, row_step, column_step) {
                    return true;
                }
            }
        }
        false
    }

    // walks from (row, column) counting tiles of `player`, stopping at the first
    // empty or opposing cell
    fn run_from(
        &self,
        player: Player,
        row: usize,
        column: usize,
        row_step: usize,
        column_step: isize,
    ) -> bool {
        let mut connected = 0;
        while connected < self.connect_length {
            let r = row + row_step * connected;
            let c = (column as isize + column_step * connected as isize) as usize;
            if !self.cells[self.index(r, c)].is(player) {
                return false;
            }
            connected += 1;
        }
        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<&str> = (0..self.columns)
                .map(|column| match self.cell(row, column) {
                    Cell::Empty => ".",
                    Cell::Owned(Player::One) => "1",
                    Cell::Owned(Player::Two) => "2",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
