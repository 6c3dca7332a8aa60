// Ultimate Tic-Tac-Toe engine: state model, rules, heuristic alpha-beta search
pub mod board;
pub mod search;
