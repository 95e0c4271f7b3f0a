//! Depth-2 lookahead
//!
//! The mover's candidate is written into the scratch occupancy, every
//! remaining candidate is scored as an opponent reply, and the best reply
//! is subtracted from the mover's own score. A move that completes a line
//! ends the game, so it is never charged for a reply.

use crate::board::{GlobalPos, Mark, Occupancy};
use crate::eval::{pick_best, score_cell, CellScore, Weights};
use crate::rules::WinEvaluator;

/// Added to the one-ply score of a move that completes a line
pub const WIN_SCORE: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookaheadScore {
    pub own: CellScore,
    /// Opponent's best reply, `None` when the move wins or no reply exists
    pub reply: Option<CellScore>,
    pub score: i64,
    /// Cells scored, the candidate included
    pub nodes: u64,
}

#[inline]
fn terminal_score(cell: &CellScore) -> i64 {
    if cell.is_winning() {
        WIN_SCORE + cell.score
    } else {
        cell.score
    }
}

/// Score `pos` for `player` against the opponent's best reply among
/// `candidates` (the eligible cells of the current position).
///
/// `scratch` is restored before returning.
#[must_use]
pub fn score_with_reply(
    eval: &WinEvaluator<'_>,
    scratch: &mut Occupancy,
    candidates: &[GlobalPos],
    pos: GlobalPos,
    player: Mark,
    weights: &Weights,
) -> LookaheadScore {
    let own = score_cell(eval, scratch, pos, player, weights);
    if own.is_winning() {
        return LookaheadScore {
            own,
            reply: None,
            score: terminal_score(&own),
            nodes: 1,
        };
    }

    let opponent = player.opponent();
    let prev = scratch.set(pos, player);
    let mut nodes = 1u64;
    let reply = {
        let scratch = &mut *scratch;
        let nodes = &mut nodes;
        pick_best(
            candidates
                .iter()
                .copied()
                .filter(|&r| r != pos)
                .map(|r| {
                    *nodes += 1;
                    score_cell(eval, scratch, r, opponent, weights)
                }),
            terminal_score,
        )
    };
    scratch.set(pos, prev);

    LookaheadScore {
        own,
        reply,
        score: own.score - reply.as_ref().map_or(0, terminal_score),
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellSet;
    use crate::rules::{Topology, TopologyRegistry};

    fn single_cube() -> TopologyRegistry {
        TopologyRegistry::new(vec![Topology::euclidean(4).unwrap()], 4).unwrap()
    }

    #[test]
    fn test_winning_move_is_terminal() {
        let reg = single_cube();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        for y in 0..3 {
            occ.set(GlobalPos::new(0, 0, y, 0), Mark::O);
        }
        let candidates = occ.eligible(&CellSet::new());
        let target = GlobalPos::new(0, 0, 3, 0);
        let result =
            score_with_reply(&eval, &mut occ, &candidates, target, Mark::O, &Weights::default());
        assert!(result.reply.is_none());
        assert!(result.score > WIN_SCORE);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_unblocked_threat_is_penalized() {
        let reg = single_cube();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        for x in 0..3 {
            occ.set(GlobalPos::new(0, x, 0, 0), Mark::X);
        }
        let candidates = occ.eligible(&CellSet::new());
        let w = Weights::default();

        let block =
            score_with_reply(&eval, &mut occ, &candidates, GlobalPos::new(0, 3, 0, 0), Mark::O, &w);
        let elsewhere =
            score_with_reply(&eval, &mut occ, &candidates, GlobalPos::new(0, 1, 1, 1), Mark::O, &w);

        assert!(elsewhere.reply.is_some_and(|r| r.is_winning()));
        assert!(block.reply.is_some_and(|r| !r.is_winning()));
        assert!(block.score > elsewhere.score);
    }

    #[test]
    fn test_scratch_restored_after_reply_scan() {
        let reg = single_cube();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        occ.set(GlobalPos::new(0, 2, 2, 2), Mark::X);
        let before = occ.clone();
        let candidates = occ.eligible(&CellSet::new());

        let result = score_with_reply(
            &eval,
            &mut occ,
            &candidates,
            GlobalPos::new(0, 1, 1, 1),
            Mark::O,
            &Weights::default(),
        );
        assert_eq!(occ, before);
        assert_eq!(result.nodes, candidates.len() as u64);
    }

    #[test]
    fn test_last_cell_has_no_reply() {
        let reg = TopologyRegistry::new(vec![Topology::new(2, 1, 1, [false; 3]).unwrap()], 2)
            .unwrap();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        occ.set(GlobalPos::new(0, 0, 0, 0), Mark::X);
        let candidates = occ.eligible(&CellSet::new());
        let result = score_with_reply(
            &eval,
            &mut occ,
            &candidates,
            GlobalPos::new(0, 1, 0, 0),
            Mark::O,
            &Weights::default(),
        );
        assert!(result.reply.is_none());
        assert_eq!(result.score, result.own.score);
    }
}
