use std::sync::mpsc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{GameState, Move};
use crate::search::alphabeta::Agent;

/// Upper bound on one root fan-out. A stalled pool becomes an error
/// instead of an indefinite wait.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("search pool stalled: {received} of {expected} results within {timeout:?}")]
    Stalled {
        expected: usize,
        received: usize,
        timeout: Duration,
    },
    #[error("worker pool construction failed: {0}")]
    Pool(String),
}

/// One first-ply search unit. The wire form is JSON; the agent field is
/// itself a serialized descriptor carrying the searching player's piece,
/// from which the worker rebuilds a local `Agent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTask {
    pub agent: String,
    pub depth: u32,
    pub state: GameState,
    pub alpha: i32,
    pub beta: i32,
    pub maximizing: bool,
    pub mv: Move,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub index: usize,
    pub score: i32,
    pub mv: Move,
}

/// Resolves a requested thread count; 0 means one worker per core.
pub fn worker_count(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Decodes and runs one serialized task to completion. `None` when the
/// payload does not decode to a task or an agent; such results are
/// discarded at the fan-in but still count toward the barrier.
pub fn run_task(payload: &str) -> Option<(i32, Move)> {
    let task: SearchTask = match serde_json::from_str(payload) {
        Ok(task) => task,
        Err(err) => {
            warn!("discarding malformed task payload: {err}");
            return None;
        }
    };
    let agent = match Agent::from_descriptor(&task.agent) {
        Ok(agent) => agent,
        Err(err) => {
            warn!("discarding task with malformed agent descriptor: {err}");
            return None;
        }
    };
    let mut state = task.state;
    let score = agent.minimax(task.depth, &mut state, task.alpha, task.beta, task.maximizing);
    Some((score, task.mv))
}

/// Fans the tasks out over a fixed worker pool and collects every result.
///
/// Each task is serialized before it leaves the dispatcher and decoded
/// inside its worker; tasks share nothing. The fan-in barrier is
/// completion-counted: malformed results count toward the expected total
/// but are excluded from the returned outcomes, so one bad task cannot
/// stall move selection. Outcomes are in arrival order.
pub fn run_batch(
    tasks: Vec<SearchTask>,
    threads: usize,
    timeout: Duration,
) -> Result<Vec<SearchOutcome>, DispatchError> {
    let expected = tasks.len();
    if expected == 0 {
        return Ok(Vec::new());
    }

    let workers = worker_count(threads);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| DispatchError::Pool(e.to_string()))?;
    debug!("dispatching {expected} tasks across {workers} workers");

    let (tx, rx) = mpsc::channel::<Option<SearchOutcome>>();
    for (index, task) in tasks.iter().enumerate() {
        let payload = serde_json::to_string(task);
        let tx = tx.clone();
        pool.spawn(move || {
            let outcome = payload
                .ok()
                .and_then(|p| run_task(&p))
                .map(|(score, mv)| SearchOutcome { index, score, mv });
            let _ = tx.send(outcome);
        });
    }
    drop(tx);

    let deadline = Instant::now() + timeout;
    let mut outcomes = Vec::with_capacity(expected);
    let mut received = 0;
    while received < expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Some(outcome)) => {
                received += 1;
                outcomes.push(outcome);
            }
            Ok(None) => {
                received += 1;
            }
            Err(_) => {
                return Err(DispatchError::Stalled {
                    expected,
                    received,
                    timeout,
                })
            }
        }
    }
    Ok(outcomes)
}
