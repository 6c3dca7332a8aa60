use anyhow::Result;
use clap::Parser;
use gridbot::board::rules::{forced_sub_board, is_draw, is_valid, overall_winner};
use gridbot::board::{Cell, GameState, Move};
use gridbot::search::alphabeta::{Agent, SearchParams};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Ultimate Tic-Tac-Toe against the engine", long_about = None)]
struct Args {
    /// Your piece: 'x' or 'o' (X moves first)
    #[arg(long, default_value = "x")]
    piece: String,

    /// Search depth once the game narrows (wide positions use a shorter one)
    #[arg(long, default_value_t = 6)]
    depth: u32,

    /// Worker threads for the root fan-out (0 = all cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Run the search on the calling thread instead of the worker pool
    #[arg(long)]
    single_threaded: bool,
}

fn parse_piece(piece_str: &str) -> Result<Cell> {
    match piece_str.to_lowercase().as_str() {
        "x" => Ok(Cell::X),
        "o" => Ok(Cell::O),
        _ => anyhow::bail!("Invalid piece: use 'x' or 'o'"),
    }
}

enum Input {
    Play(Move),
    Undo,
    Reset,
    Quit,
}

fn get_human_input(state: &GameState) -> Result<Input> {
    loop {
        match forced_sub_board(state) {
            Some((row, col)) => print!("Your move in sub-board ({row}, {col}) as 'row col': "),
            None => print!("Your move anywhere as 'row col': "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        match input {
            "undo" => return Ok(Input::Undo),
            "reset" => return Ok(Input::Reset),
            "quit" => return Ok(Input::Quit),
            _ => {}
        }

        let mut parts = input.split_whitespace();
        let coords = (
            parts.next().and_then(|s| s.parse::<usize>().ok()),
            parts.next().and_then(|s| s.parse::<usize>().ok()),
        );
        if let (Some(row), Some(col)) = coords {
            if is_valid(row, col, state) {
                return Ok(Input::Play(Move::new(row, col)));
            }
            println!("Illegal move!");
        } else {
            println!("Invalid input! Use 'row col' (0-8), or undo/reset/quit");
        }
    }
}

/// True when the game ended; announces the result.
fn announce_if_over(state: &GameState) -> bool {
    if let Some(winner) = overall_winner(&state.sub_boards) {
        println!("\n{state}");
        println!("{winner} wins the game!");
        return true;
    }
    if is_draw(&state.board) {
        println!("\n{state}");
        println!("The game is a draw!");
        return true;
    }
    false
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let human_piece = parse_piece(&args.piece)?;
    let agent = Agent::new(human_piece.other());
    let params = SearchParams {
        long_depth: args.depth,
        threads: args.threads,
        ..SearchParams::default()
    };

    // X always opens.
    let mut state = GameState::new(Cell::X);

    loop {
        if announce_if_over(&state) {
            break;
        }

        if state.turn == human_piece {
            println!("\n{state}");
            match get_human_input(&state)? {
                Input::Play(mv) => {
                    state.commit(mv);
                }
                Input::Undo => {
                    state.undo();
                }
                Input::Reset => {
                    state.reset(Cell::X);
                }
                Input::Quit => break,
            }
        } else {
            println!("Thinking...");
            let picked = if args.single_threaded {
                agent.pick_move_single_threaded(&state, &params)
            } else {
                agent.pick_move(&state, &params)?
            };
            match picked {
                Some(mv) => {
                    println!("Engine plays {mv}");
                    state.commit(mv);
                }
                None => {
                    println!("No legal moves available!");
                    break;
                }
            }
        }
    }

    Ok(())
}
