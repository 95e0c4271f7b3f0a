//! One-ply cell scoring
//!
//! A candidate cell is scored from three evaluator queries:
//! - lines the mover would complete by taking it
//! - lines the opponent would complete there, denied by taking it first
//! - lines through the cell the mover can still win
//!
//! Every query runs on a scratch occupancy and leaves it as it was found.

use crate::board::{GlobalPos, Mark, Occupancy};
use crate::config::AiConfig;
use crate::rules::WinEvaluator;

/// Weights applied to the three components of a [`CellScore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub complete: i64,
    pub deny: i64,
    pub positional: i64,
}

impl Default for Weights {
    fn default() -> Self {
        Self::from(&AiConfig::default())
    }
}

impl From<&AiConfig> for Weights {
    fn from(ai: &AiConfig) -> Self {
        Self {
            complete: i64::from(ai.complete_weight),
            deny: i64::from(ai.deny_weight),
            positional: i64::from(ai.positional_weight),
        }
    }
}

/// Score breakdown for one candidate cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScore {
    pub pos: GlobalPos,
    pub completes: usize,
    pub denies: usize,
    pub open_lines: usize,
    pub score: i64,
}

impl CellScore {
    #[inline]
    pub fn is_winning(&self) -> bool {
        self.completes > 0
    }
}

/// Score `pos` for `player`.
///
/// `scratch` must hold the position being searched; it is restored before
/// returning.
#[must_use]
pub fn score_cell(
    eval: &WinEvaluator<'_>,
    scratch: &mut Occupancy,
    pos: GlobalPos,
    player: Mark,
    weights: &Weights,
) -> CellScore {
    let completes = eval.completions_if_played(scratch, pos, player);
    let denies = eval.completions_if_played(scratch, pos, player.opponent());
    let open_lines = eval.open_through(scratch, pos, player);

    let score = completes as i64 * weights.complete
        + denies as i64 * weights.deny
        + open_lines as i64 * weights.positional;

    CellScore {
        pos,
        completes,
        denies,
        open_lines,
        score,
    }
}

/// Highest score, first in iteration order on ties.
///
/// Fed with candidates sorted by (board, x, y, z) this gives the lowest
/// board then the lexicographically lowest coordinate among equals.
pub fn pick_best<T, I>(candidates: I, score: impl Fn(&T) -> i64) -> Option<T>
where
    I: IntoIterator<Item = T>,
{
    let mut best: Option<(i64, T)> = None;
    for candidate in candidates {
        let s = score(&candidate);
        match &best {
            Some((top, _)) if s <= *top => {}
            _ => best = Some((s, candidate)),
        }
    }
    best.map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Topology, TopologyRegistry};

    fn single_cube() -> TopologyRegistry {
        TopologyRegistry::new(vec![Topology::euclidean(4).unwrap()], 4).unwrap()
    }

    #[test]
    fn test_completion_dominates() {
        let reg = single_cube();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        for y in 0..3 {
            occ.set(GlobalPos::new(0, 0, y, 0), Mark::O);
        }
        let before = occ.clone();

        let weights = Weights::default();
        let win = score_cell(&eval, &mut occ, GlobalPos::new(0, 0, 3, 0), Mark::O, &weights);
        assert_eq!(win.completes, 1);
        assert_eq!(win.denies, 0);
        assert!(win.is_winning());
        assert_eq!(occ, before);

        let other = score_cell(&eval, &mut occ, GlobalPos::new(0, 2, 2, 2), Mark::O, &weights);
        assert!(win.score > other.score);
    }

    #[test]
    fn test_denial_counted_for_opponent_threat() {
        let reg = single_cube();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        for x in 0..3 {
            occ.set(GlobalPos::new(0, x, 1, 1), Mark::X);
        }
        let block = score_cell(
            &eval,
            &mut occ,
            GlobalPos::new(0, 3, 1, 1),
            Mark::O,
            &Weights::default(),
        );
        assert_eq!(block.completes, 0);
        assert_eq!(block.denies, 1);
        assert!(block.score >= 500);
    }

    #[test]
    fn test_positional_prefers_richer_cells() {
        let reg = single_cube();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        let w = Weights::default();
        // Corner has 7 lines, an edge cell 4
        let corner = score_cell(&eval, &mut occ, GlobalPos::new(0, 0, 0, 0), Mark::O, &w);
        let edge = score_cell(&eval, &mut occ, GlobalPos::new(0, 1, 0, 0), Mark::O, &w);
        assert_eq!(corner.open_lines, 7);
        assert_eq!(edge.open_lines, 4);
        assert!(corner.score > edge.score);
    }

    #[test]
    fn test_pick_best_keeps_first_on_tie() {
        let items = [(1, 5), (2, 9), (3, 9), (4, 1)];
        assert_eq!(pick_best(items, |&(_, s)| s), Some((2, 9)));
        assert_eq!(pick_best(Vec::<(i32, i64)>::new(), |&(_, s)| s), None);
    }
}
