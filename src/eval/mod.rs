//! Candidate move evaluation
//!
//! Scores individual cells from completion, denial and positional terms,
//! all answered by the win evaluator.

pub mod heuristic;

pub use heuristic::{pick_best, score_cell, CellScore, Weights};
