use crate::board::{Board, Cell, GameState, Move, SubBoards, BOARD_LEN, SUB_LEN};

/// The 8 canonical winning lines of a 3x3 grid: rows, then columns, then
/// diagonals. The same table serves sub-boards (offset into the 9x9 grid)
/// and the macro grid of sub-board results.
pub const WIN_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// The owner of one line inside the sub-board at (sub_row, sub_col), or
/// `Empty` when the line is not fully held by one player.
pub fn line_winner(board: &Board, line: &[(usize, usize); 3], sub_row: usize, sub_col: usize) -> Cell {
    let first = board[line[0].0 + sub_row * 3][line[0].1 + sub_col * 3];
    if first == Cell::Empty {
        return Cell::Empty;
    }
    for &(r, c) in &line[1..] {
        if board[r + sub_row * 3][c + sub_col * 3] != first {
            return Cell::Empty;
        }
    }
    first
}

/// The winner of the sub-board at (sub_row, sub_col), `Empty` when open or
/// drawn. A legally reached sub-board has at most one winner, so returning
/// on the first matched line is sound.
pub fn sub_board_winner(board: &Board, sub_row: usize, sub_col: usize) -> Cell {
    for line in &WIN_LINES {
        let winner = line_winner(board, line, sub_row, sub_col);
        if winner != Cell::Empty {
            return winner;
        }
    }
    Cell::Empty
}

/// Refreshes all 9 sub-board results from the grid. Results are derived,
/// never incrementally maintained: 9 sub-boards x 8 lines is cheap and a
/// full recompute cannot go stale while search mutates the board.
pub fn recompute_sub_boards(state: &mut GameState) {
    for sub_row in 0..SUB_LEN {
        for sub_col in 0..SUB_LEN {
            state.sub_boards[sub_row][sub_col] = sub_board_winner(&state.board, sub_row, sub_col);
        }
    }
}

/// The player holding three sub-boards in a line, if any.
pub fn overall_winner(sub_boards: &SubBoards) -> Option<Cell> {
    for line in &WIN_LINES {
        let first = sub_boards[line[0].0][line[0].1];
        if first != Cell::Empty && line.iter().all(|&(r, c)| sub_boards[r][c] == first) {
            return Some(first);
        }
    }
    None
}

/// True when every square holds a piece.
pub fn is_draw(board: &Board) -> bool {
    board.iter().all(|row| row.iter().all(|c| c.is_piece()))
}

fn sub_board_full(board: &Board, sub_row: usize, sub_col: usize) -> bool {
    for r in 0..3 {
        for c in 0..3 {
            if board[sub_row * 3 + r][sub_col * 3 + c] == Cell::Empty {
                return false;
            }
        }
    }
    true
}

/// Decides whether playing (row, col) is legal under the send-to rule.
/// The check order matters and encodes the canonical exceptions:
/// a full target sub-board frees the whole grid, and a decided target
/// sub-board frees every still-open sub-board.
pub fn is_valid(row: usize, col: usize, state: &GameState) -> bool {
    if row >= BOARD_LEN || col >= BOARD_LEN {
        return false;
    }
    // First move of the game: anywhere.
    let prev = match state.previous_move {
        None => return true,
        Some(mv) => mv,
    };
    if state.board[row][col] != Cell::Empty {
        return false;
    }

    let picked = (row / 3, col / 3);
    let target = prev.sends_to();

    // Sent to a fully occupied sub-board: any empty square is playable.
    if sub_board_full(&state.board, target.0, target.1) {
        return true;
    }

    let picked_open = state.sub_boards[picked.0][picked.1] == Cell::Empty;
    let target_open = state.sub_boards[target.0][target.1] == Cell::Empty;

    // Sent to a decided sub-board: free choice among the open ones.
    if picked_open && picked != target && !target_open {
        return true;
    }
    if !picked_open {
        return false;
    }
    picked == target
}

/// Every legal square, row-major. The enumeration order is the tie-break
/// order for move selection and for the all-losing fallback.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    for row in 0..BOARD_LEN {
        for col in 0..BOARD_LEN {
            if is_valid(row, col, state) {
                moves.push(Move::new(row, col));
            }
        }
    }
    moves
}

/// The sub-board the side to move is confined to, or `None` when the whole
/// grid is open (game start, full target, or decided target).
pub fn forced_sub_board(state: &GameState) -> Option<(usize, usize)> {
    let prev = state.previous_move?;
    let target = prev.sends_to();
    if sub_board_full(&state.board, target.0, target.1) {
        return None;
    }
    if state.sub_boards[target.0][target.1] != Cell::Empty {
        return None;
    }
    Some(target)
}
