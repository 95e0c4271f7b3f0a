//! Adversarial search for the hardest tier
//!
//! Contains a depth-2 lookahead: the mover's one-ply score minus the
//! opponent's best one-ply reply.

pub mod lookahead;

pub use lookahead::{score_with_reply, LookaheadScore, WIN_SCORE};
