use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connectn_ai::{Board, Cell, IllegalMove, Player};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    Won(Player),
    Draw,
}

/// A single game session: the board plus whose turn it is
pub struct Game {
    pub board: Board,
    pub to_move: Player,
    pub state: GameState,
}

impl Game {
    pub fn new(rows: usize, columns: usize, connect_length: usize) -> Self {
        Self {
            board: Board::new(rows, columns, connect_length),
            to_move: Player::One,
            state: GameState::Playing,
        }
    }

    /// Plays `column` for the player to move, updating the game state
    ///
    /// A rejected move leaves the board and the turn unchanged so the same
    /// player can try again.
    pub fn play_checked(&mut self, column: usize) -> Result<GameState, IllegalMove> {
        self.board.place(column, self.to_move)?;

        self.state = if self.board.wins_for(self.to_move) {
            GameState::Won(self.to_move)
        } else if self.board.is_full() {
            GameState::Draw
        } else {
            GameState::Playing
        };
        self.to_move = self.to_move.other();

        Ok(self.state)
    }

    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();
        let rows = self.board.row_count();
        let columns = self.board.column_count();

        let labels: String = (0..columns).map(|x| x.to_string()).collect();
        stdout.queue(PrintStyledContent(style(labels + "\n")))?;
        for _ in 0..rows {
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;

        // the bottom row is drawn on the cursor's line
        let (origin_x, origin_y) = crossterm::cursor::position()?;

        for row in 0..rows {
            for column in 0..columns {
                stdout
                    .queue(MoveTo(
                        origin_x + column as u16,
                        origin_y.saturating_sub((rows - 1 - row) as u16),
                    ))?
                    .queue(PrintStyledContent(
                        style("O")
                            .attribute(Attribute::Bold)
                            .on(Color::DarkBlue)
                            .with(match self.board.cell(row, column) {
                                Cell::Owned(Player::One) => Color::Red,
                                Cell::Owned(Player::Two) => Color::Yellow,
                                Cell::Empty => Color::DarkBlue,
                            }),
                    ))?;
            }
        }
        stdout
            .queue(MoveTo(origin_x + columns as u16, origin_y))?
            .queue(PrintStyledContent(style("\n")))?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_alternate() {
        let mut game = Game::new(6, 7, 4);
        assert_eq!(game.play_checked(3), Ok(GameState::Playing));
        assert_eq!(game.to_move, Player::Two);
        assert_eq!(game.board.cell(5, 3), Cell::Owned(Player::One));
    }

    #[test]
    fn rejected_move_keeps_the_turn() {
        let mut game = Game::new(6, 7, 4);
        assert_eq!(
            game.play_checked(7),
            Err(IllegalMove::OutOfRange {
                column: 7,
                columns: 7
            })
        );
        assert_eq!(game.to_move, Player::One);
    }

    #[test]
    fn game_ends_on_a_win() {
        let mut game = Game::new(6, 7, 4);
        for &column in &[0, 0, 1, 1, 2, 2] {
            assert_eq!(game.play_checked(column), Ok(GameState::Playing));
        }
        assert_eq!(game.play_checked(3), Ok(GameState::Won(Player::One)));
    }

    #[test]
    fn game_ends_in_a_draw() {
        // 1 2 1
        // 1 2 2
        // 2 1 1
        let mut game = Game::new(3, 3, 3);
        for &column in &[1, 0, 2, 1, 0, 2, 0, 1] {
            assert_eq!(game.play_checked(column), Ok(GameState::Playing));
        }
        assert_eq!(game.play_checked(2), Ok(GameState::Draw));
    }
}
