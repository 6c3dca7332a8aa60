use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::rules::{legal_moves, overall_winner, recompute_sub_boards};
use crate::board::{Cell, GameState, Move};
use crate::search::dispatch::{self, DispatchError, SearchTask, DISPATCH_TIMEOUT};
use crate::search::eval::{evaluate, WIN_SCORE};

/// At or below this many first-ply moves the game is narrow enough to
/// afford the long search.
const NARROW_ROOT: usize = 9;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Depth used once branching narrows late in the game.
    pub long_depth: u32,
    /// Depth used while the first ply is still wide.
    pub short_depth: u32,
    /// Worker threads for the root fan-out; 0 means all available cores.
    pub threads: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            long_depth: 6,
            short_depth: 4,
            threads: 0,
        }
    }
}

impl SearchParams {
    pub fn depth_for(&self, root_moves: usize) -> u32 {
        if root_moves <= NARROW_ROOT {
            self.long_depth
        } else {
            self.short_depth
        }
    }
}

/// A searching player. Carries piece identity only; depth travels in the
/// params and in dispatched tasks, so one descriptor serves every depth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Agent {
    pub piece: Cell,
    pub opponent: Cell,
}

impl Agent {
    pub fn new(piece: Cell) -> Self {
        Self {
            piece,
            opponent: piece.other(),
        }
    }

    /// Wire form of the agent for the worker transport.
    pub fn descriptor(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Rebuilds a worker-local agent from its wire form.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(descriptor)
    }

    /// Minimax with alpha-beta pruning over `state`, mutated in place.
    ///
    /// Every placement is paired with an exact undo (square and
    /// `previous_move`), so siblings never see residual state. Sub-board
    /// results are recomputed on entry because branches write the grid
    /// directly. With no legal move left the untouched sentinel
    /// (-WIN_SCORE maximizing, +WIN_SCORE minimizing) falls through and
    /// means "no information", not a real score.
    pub fn minimax(
        &self,
        depth: u32,
        state: &mut GameState,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        recompute_sub_boards(state);
        if let Some(winner) = overall_winner(&state.sub_boards) {
            return if winner == self.opponent {
                -WIN_SCORE
            } else {
                WIN_SCORE
            };
        }
        if depth == 0 {
            return evaluate(state, self.piece);
        }

        let moves = legal_moves(state);
        if maximizing {
            let mut best = -WIN_SCORE;
            for mv in moves {
                let restored = state.previous_move;
                let (row, col) = mv.coords();
                state.board[row][col] = self.piece;
                state.previous_move = Some(mv);
                let score = self.minimax(depth - 1, state, alpha, beta, false);
                state.board[row][col] = Cell::Empty;
                state.previous_move = restored;

                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = WIN_SCORE;
            for mv in moves {
                let restored = state.previous_move;
                let (row, col) = mv.coords();
                state.board[row][col] = self.opponent;
                state.previous_move = Some(mv);
                let score = self.minimax(depth - 1, state, alpha, beta, true);
                state.board[row][col] = Cell::Empty;
                state.previous_move = restored;

                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Scores every first-ply move on the calling thread and picks the
    /// best. The first strictly greater score wins; later equal scores do
    /// not displace it. When every line loses, the final candidate is
    /// played rather than resigning.
    pub fn pick_move_single_threaded(
        &self,
        state: &GameState,
        params: &SearchParams,
    ) -> Option<Move> {
        let mut local = state.clone();
        recompute_sub_boards(&mut local);
        let moves = legal_moves(&local);
        if moves.is_empty() {
            return None;
        }
        let depth = params.depth_for(moves.len());

        let mut best_score = -WIN_SCORE;
        let mut best_move = None;
        for &mv in &moves {
            let restored = local.previous_move;
            let (row, col) = mv.coords();
            local.board[row][col] = self.piece;
            local.previous_move = Some(mv);
            let score = self.minimax(depth, &mut local, -WIN_SCORE, WIN_SCORE, false);
            local.board[row][col] = Cell::Empty;
            local.previous_move = restored;

            debug!("candidate {mv} scored {score}");
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        if best_score == -WIN_SCORE {
            best_move = moves.last().copied();
        }
        info!(
            "picked {:?} score {} depth {} (single-threaded)",
            best_move, best_score, depth
        );
        best_move
    }

    /// Same selection as `pick_move_single_threaded`, with the first ply
    /// fanned out across the worker pool. Outcomes are re-ordered by task
    /// index before reduction, so completion order never changes the
    /// chosen move.
    pub fn pick_move(
        &self,
        state: &GameState,
        params: &SearchParams,
    ) -> Result<Option<Move>, DispatchError> {
        let mut local = state.clone();
        recompute_sub_boards(&mut local);
        let moves = legal_moves(&local);
        if moves.is_empty() {
            return Ok(None);
        }
        let depth = params.depth_for(moves.len());

        let mut tasks = Vec::with_capacity(moves.len());
        for &mv in &moves {
            let restored = local.previous_move;
            let (row, col) = mv.coords();
            local.board[row][col] = self.piece;
            local.previous_move = Some(mv);
            tasks.push(SearchTask {
                agent: self.descriptor(),
                depth,
                state: local.clone(),
                alpha: -WIN_SCORE,
                beta: WIN_SCORE,
                maximizing: false,
                mv,
            });
            local.board[row][col] = Cell::Empty;
            local.previous_move = restored;
        }

        let mut outcomes = dispatch::run_batch(tasks, params.threads, DISPATCH_TIMEOUT)?;
        outcomes.sort_by_key(|o| o.index);

        let mut best_score = -WIN_SCORE;
        let mut best_move = None;
        for outcome in &outcomes {
            debug!("candidate {} scored {}", outcome.mv, outcome.score);
            if outcome.score > best_score {
                best_score = outcome.score;
                best_move = Some(outcome.mv);
            }
        }

        if best_score == -WIN_SCORE {
            best_move = moves.last().copied();
        }
        info!(
            "picked {:?} score {} depth {} workers {}",
            best_move,
            best_score,
            depth,
            dispatch::worker_count(params.threads)
        );
        Ok(best_move)
    }
}
