use crate::board::rules::{line_winner, WIN_LINES};
use crate::board::{Cell, GameState, BOARD_LEN, SUB_LEN};

/// Terminal win/loss sentinel, far above any heuristic magnitude
/// (|evaluate| stays below 20_000 on any board).
pub const WIN_SCORE: i32 = 1_000_000;

const SUB_WIN_BONUS: i32 = 100;
const LINE_UNIT: i32 = 2;
const EXPOSED_CELL_PENALTY: i32 = 50;

/// Static utility of `state` from the fixed perspective of `piece`.
/// Higher favours `piece`. Reads `state.sub_boards`, so callers must have
/// recomputed them for the current grid.
///
/// Three passes, in order:
/// 1. per sub-board line: +-100 for a decided line, and the +-2-per-square
///    partial when one side holds two of the line's squares with the third
///    empty (the sub-board is then flagged nearly decided);
/// 2. the same partial over the 8 macro lines of sub-board results;
/// 3. every occupied square that sends the next player to a decided or
///    nearly decided sub-board costs its owner 50 - such a move hands the
///    opponent a free choice of sub-board.
pub fn evaluate(state: &GameState, piece: Cell) -> i32 {
    let opponent = piece.other();
    let mut score = 0i32;
    let mut near_won = [[false; SUB_LEN]; SUB_LEN];

    let unit = |cell: Cell| -> i32 {
        if cell == piece {
            LINE_UNIT
        } else if cell == opponent {
            -LINE_UNIT
        } else {
            0
        }
    };

    for sub_row in 0..SUB_LEN {
        for sub_col in 0..SUB_LEN {
            for line in &WIN_LINES {
                let winner = line_winner(&state.board, line, sub_row, sub_col);
                if winner == piece {
                    score += SUB_WIN_BONUS;
                } else if winner == opponent {
                    score -= SUB_WIN_BONUS;
                }

                let partial: i32 = line
                    .iter()
                    .map(|&(r, c)| unit(state.board[r + sub_row * 3][c + sub_col * 3]))
                    .sum();
                if partial.abs() > LINE_UNIT {
                    score += partial;
                    near_won[sub_row][sub_col] = true;
                }
            }
        }
    }

    for line in &WIN_LINES {
        let partial: i32 = line.iter().map(|&(r, c)| unit(state.sub_boards[r][c])).sum();
        if partial.abs() > LINE_UNIT {
            score += partial;
        }
    }

    for row in 0..BOARD_LEN {
        for col in 0..BOARD_LEN {
            let target = (row % 3, col % 3);
            if state.sub_boards[target.0][target.1] != Cell::Empty || near_won[target.0][target.1] {
                let cell = state.board[row][col];
                if cell == piece {
                    score -= EXPOSED_CELL_PENALTY;
                } else if cell == opponent {
                    score += EXPOSED_CELL_PENALTY;
                }
            }
        }
    }

    score
}
