use std::time::Duration;

use gridbot::board::{Cell, GameState, Move};
use gridbot::search::alphabeta::{Agent, SearchParams};
use gridbot::search::dispatch::{run_batch, run_task, worker_count, SearchTask};
use gridbot::search::eval::WIN_SCORE;

fn midgame_state() -> GameState {
    let mut state = GameState::new(Cell::X);
    for &(row, col) in &[(4, 4), (3, 3), (0, 0), (1, 1), (4, 5), (4, 7)] {
        assert!(state.commit(Move::new(row, col)), "setup move ({row},{col}) must be legal");
    }
    state
}

#[test]
fn parallel_pick_matches_single_thread() {
    let state = midgame_state();
    let agent = Agent::new(state.turn);
    let params = SearchParams { long_depth: 3, short_depth: 3, threads: 4 };

    let single = agent.pick_move_single_threaded(&state, &params);
    let parallel = agent.pick_move(&state, &params).expect("dispatch must complete");
    assert_eq!(parallel, single, "fan-out changed the chosen move");
}

#[test]
fn parallel_pick_keeps_the_losing_fallback() {
    // O has closed the macro diagonal; every candidate scores -WIN_SCORE.
    let mut state = GameState::new(Cell::X);
    for sub in 0..3usize {
        for r in 0..3usize {
            state.board[sub * 3 + r][sub * 3] = Cell::O;
        }
    }
    state.previous_move = Some(Move::new(3, 3));
    state.turn = Cell::X;

    let agent = Agent::new(Cell::X);
    let params = SearchParams::default();
    let single = agent.pick_move_single_threaded(&state, &params);
    let parallel = agent.pick_move(&state, &params).expect("dispatch must complete");
    assert_eq!(parallel, Some(Move::new(8, 5)));
    assert_eq!(parallel, single);
}

#[test]
fn task_wire_roundtrip_reproduces_the_direct_score() {
    let state = midgame_state();
    let agent = Agent::new(state.turn);
    let mv = Move::new(3, 4);

    let mut child = state.clone();
    child.board[3][4] = agent.piece;
    child.previous_move = Some(mv);

    let task = SearchTask {
        agent: agent.descriptor(),
        depth: 2,
        state: child.clone(),
        alpha: -WIN_SCORE,
        beta: WIN_SCORE,
        maximizing: false,
        mv,
    };
    let payload = serde_json::to_string(&task).expect("task serializes");

    let (score, reported) = run_task(&payload).expect("well-formed task must run");
    assert_eq!(reported, mv);
    let direct = agent.minimax(2, &mut child, -WIN_SCORE, WIN_SCORE, false);
    assert_eq!(score, direct, "worker-side score differs from a direct search");
}

#[test]
fn malformed_payloads_are_discarded() {
    assert!(run_task("not json at all").is_none());

    let state = GameState::new(Cell::X);
    let task = SearchTask {
        agent: "garbage".to_string(),
        depth: 1,
        state,
        alpha: -WIN_SCORE,
        beta: WIN_SCORE,
        maximizing: false,
        mv: Move::new(0, 0),
    };
    let payload = serde_json::to_string(&task).expect("task serializes");
    assert!(run_task(&payload).is_none(), "a bad agent descriptor must not produce a score");
}

#[test]
fn batch_returns_one_outcome_per_task() {
    let state = midgame_state();
    let agent = Agent::new(state.turn);
    let tasks: Vec<SearchTask> = [(3usize, 4usize), (3, 5), (5, 3)]
        .iter()
        .map(|&(row, col)| {
            let mv = Move::new(row, col);
            let mut child = state.clone();
            child.board[row][col] = agent.piece;
            child.previous_move = Some(mv);
            SearchTask {
                agent: agent.descriptor(),
                depth: 1,
                state: child,
                alpha: -WIN_SCORE,
                beta: WIN_SCORE,
                maximizing: false,
                mv,
            }
        })
        .collect();

    let outcomes = run_batch(tasks, 2, Duration::from_secs(30)).expect("batch completes");
    assert_eq!(outcomes.len(), 3);
    let mut indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2], "every task index must report exactly once");
}

#[test]
fn empty_batch_completes_immediately() {
    let outcomes = run_batch(Vec::new(), 2, Duration::from_millis(10)).expect("empty batch");
    assert!(outcomes.is_empty());
}

#[test]
fn worker_count_has_a_floor_and_honours_requests() {
    assert!(worker_count(0) >= 1, "auto-detection must yield at least one worker");
    assert_eq!(worker_count(3), 3);
}
