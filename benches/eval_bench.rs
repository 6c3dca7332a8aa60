use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridbot::board::{Cell, GameState, Move};
use gridbot::search::eval::evaluate;

fn midgame_state() -> GameState {
    let mut state = GameState::new(Cell::X);
    for &(row, col) in &[(4, 4), (3, 3), (0, 0), (1, 1), (4, 5), (4, 7), (3, 4)] {
        assert!(state.commit(Move::new(row, col)));
    }
    state
}

fn bench_eval(c: &mut Criterion) {
    let state = midgame_state();
    c.bench_function("evaluate_midgame", |b| {
        b.iter(|| evaluate(black_box(&state), Cell::X))
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
