use anyhow::{ensure, Result};
use clap::Parser;

use std::io::{stdin, stdout, Stdin, Write};

use connectn_ai::*;

mod game;
use game::*;

/// Play Connect N against a lookahead computer player
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of rows on the board
    #[clap(short, long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Number of columns on the board
    #[clap(short, long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    /// Number of tiles in a line needed to win
    #[clap(short = 'n', long, default_value_t = DEFAULT_CONNECT_LENGTH)]
    connect: usize,

    /// How many moves the computer looks ahead
    #[clap(short, long, default_value_t = DEFAULT_PLY)]
    ply: u32,

    /// How the computer picks between equally good columns: left, right or random
    #[clap(short, long, default_value_t = TieBreakPolicy::UniformRandom)]
    tie_break: TieBreakPolicy,

    /// Let the computer play first, as Player 1
    #[clap(long, action = clap::ArgAction::SetTrue)]
    ai_first: bool,

    /// Two human players, no computer
    #[clap(long, action = clap::ArgAction::SetTrue, conflicts_with = "ai_vs_ai")]
    two_player: bool,

    /// The computer plays both sides
    #[clap(long, action = clap::ArgAction::SetTrue)]
    ai_vs_ai: bool,

    /// Print the computer's column scores and search statistics
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

impl Args {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.connect >= 2,
            "connect length must be at least 2, got {}",
            self.connect
        );
        ensure!(
            self.rows >= self.connect && self.columns >= self.connect,
            "a {}x{} board cannot fit a line of {}",
            self.rows,
            self.columns,
            self.connect
        );
        Ok(())
    }

    // (Player 1, Player 2)
    fn ai_players(&self) -> (bool, bool) {
        if self.two_player {
            (false, false)
        } else if self.ai_vs_ai {
            (true, true)
        } else if self.ai_first {
            (true, false)
        } else {
            (false, true)
        }
    }
}

fn ask_yes_no(stdin: &Stdin, question: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{}", question);
        stdout().flush()?;
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            // end of input
            None => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn play(args: &Args, stdin: &Stdin) -> Result<()> {
    let mut game = Game::new(args.rows, args.columns, args.connect);
    let ai_players = args.ai_players();

    loop {
        game.display()?;

        match game.state {
            GameState::Playing => {
                let player = game.to_move;
                println!("{} Go!", player);

                let next_move =
                    // AI player
                    if (player == Player::One && ai_players.0) || (player == Player::Two && ai_players.1) {
                        println!("AI is thinking...");
                        stdout().flush()?;

                        // slow down play if both players are AI
                        if ai_players == (true, true) {
                            std::thread::sleep(std::time::Duration::new(1, 0));
                        }

                        let mut searcher =
                            Searcher::new(SearchConfig::new(player, args.tie_break, args.ply));
                        let column = if args.verbose {
                            searcher.choose_column_verbose(&mut game.board)?
                        } else {
                            searcher.choose_column(&mut game.board)?
                        };
                        println!("{} plays column {}", player, column);
                        column

                    // human player
                    } else {
                        print!("Move input > ");
                        stdout().flush()?;
                        let mut input_str = String::new();
                        if stdin.read_line(&mut input_str)? == 0 {
                            // end of input
                            return Ok(());
                        }

                        match input_str.trim().parse::<usize>() {
                            Err(_) => {
                                println!("Invalid number: {}", input_str.trim());
                                continue;
                            }
                            Ok(column) => column,
                        }
                    };

                if let Err(err) = game.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::Won(player) => {
                println!("{} Wins!!!", player);
                break;
            }
            GameState::Draw => {
                println!("Tie!");
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    let stdin = stdin();

    println!("Welcome to Connect {}\n", args.connect);

    loop {
        play(&args, &stdin)?;
        if !ask_yes_no(&stdin, "Play again? y/n: ")? {
            break;
        }
    }
    Ok(())
}
