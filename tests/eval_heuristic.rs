use gridbot::board::rules::recompute_sub_boards;
use gridbot::board::{Cell, GameState};
use gridbot::search::eval::evaluate;

#[test]
fn empty_board_scores_zero() {
    let state = GameState::new(Cell::X);
    assert_eq!(evaluate(&state, Cell::X), 0);
    assert_eq!(evaluate(&state, Cell::O), 0);
}

#[test]
fn two_in_a_line_scores_the_partial_and_the_exposure() {
    let mut state = GameState::new(Cell::X);
    state.board[0][0] = Cell::X;
    state.board[0][1] = Cell::X;
    recompute_sub_boards(&mut state);

    // +4 for the open two-in-a-line, -50 because (0,0) sends the opponent
    // to the now nearly-won sub-board (0,0).
    assert_eq!(evaluate(&state, Cell::X), -46);
    assert_eq!(evaluate(&state, Cell::O), 46);
}

#[test]
fn won_sub_board_scores_the_bonus_lines_and_exposure() {
    let mut state = GameState::new(Cell::X);
    state.board[0][0] = Cell::X;
    state.board[0][1] = Cell::X;
    state.board[0][2] = Cell::X;
    recompute_sub_boards(&mut state);

    // +100 for the decided line, +6 for its partial, -50 for (0,0)
    // pointing at the decided sub-board.
    assert_eq!(evaluate(&state, Cell::X), 56);
    assert_eq!(evaluate(&state, Cell::O), -56);
}

#[test]
fn opponent_pressure_counts_against_their_exposure() {
    let mut state = GameState::new(Cell::X);
    state.board[4][4] = Cell::O;
    state.board[4][5] = Cell::O;
    recompute_sub_boards(&mut state);

    // -4 for O's open two-in-a-line, +50 because O's piece at (4,4) sends
    // X to the nearly-won sub-board (1,1).
    assert_eq!(evaluate(&state, Cell::X), 46);
}

#[test]
fn evaluation_is_antisymmetric() {
    let mut state = GameState::new(Cell::X);
    for &(row, col, cell) in &[
        (0usize, 0usize, Cell::X),
        (0, 1, Cell::X),
        (0, 2, Cell::X),
        (4, 4, Cell::O),
        (4, 5, Cell::O),
        (8, 8, Cell::X),
        (7, 7, Cell::O),
        (2, 6, Cell::X),
        (5, 3, Cell::O),
    ] {
        state.board[row][col] = cell;
    }
    recompute_sub_boards(&mut state);

    assert_eq!(
        evaluate(&state, Cell::X),
        -evaluate(&state, Cell::O),
        "a position worth s to X must be worth -s to O"
    );
}
