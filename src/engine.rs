//! Move selection for the computer player
//!
//! Three tiers share the same eligible-cell filter and the same win oracle:
//!
//! 1. **Rookie**: a random winning cell if one exists, otherwise any random
//!    eligible cell
//! 2. **Elite**: one-ply heuristic (complete, deny, positional)
//! 3. **Godlike**: the Elite score minus the opponent's best reply
//!
//! Elite and Godlike break ties toward the lowest board id, then the
//! lexicographically lowest (x, y, z). The real occupancy is never touched;
//! every hypothetical move goes into one scratch copy per decision.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hyperspace::board::CellSet;
//! use hyperspace::config::GameConfig;
//! use hyperspace::engine::{AIEngine, Difficulty};
//!
//! let config = GameConfig::default();
//! let registry = Arc::new(config.registry().unwrap());
//! let mut engine = AIEngine::with_seed(Arc::clone(&registry), &config.ai, 7).unwrap();
//!
//! let occupancy = registry.empty_occupancy();
//! let pos = engine
//!     .select_move(&occupancy, &CellSet::new(), Difficulty::Elite)
//!     .unwrap();
//! assert!(occupancy.is_empty_at(pos));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::board::{CellSet, GlobalPos, Mark, Occupancy};
use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::eval::{pick_best, score_cell, Weights};
use crate::rules::{Axis, TopologyRegistry, WinEvaluator};
use crate::search::score_with_reply;

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Rookie,
    #[default]
    Elite,
    Godlike,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Rookie, Difficulty::Elite, Difficulty::Godlike];

    /// Display label used by the front end
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Rookie => "ROOKIE",
            Difficulty::Elite => "ELITE",
            Difficulty::Godlike => "GODLIKE",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Rookie => "Rookie",
            Difficulty::Elite => "Elite",
            Difficulty::Godlike => "Godlike",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    /// Accepts tier names and the easy/medium/hard aliases, any case.
    /// Anything else is a configuration error.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rookie" | "easy" => Ok(Difficulty::Rookie),
            "elite" | "medium" => Ok(Difficulty::Elite),
            "godlike" | "hard" => Ok(Difficulty::Godlike),
            _ => Err(Error::config(format!(
                "unknown difficulty \"{s}\", expected Rookie, Elite or Godlike"
            ))),
        }
    }
}

/// Which rule produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// The move completes a line for the AI
    ImmediateWin,
    /// Uniform random pick (Rookie without a winning cell)
    Random,
    /// Best one-ply score
    Heuristic,
    /// Best depth-2 score
    Lookahead,
}

/// Chosen move with selection statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub best_move: GlobalPos,
    /// Score of the chosen cell, zero for random picks
    pub score: i64,
    pub kind: SelectionKind,
    pub difficulty: Difficulty,
    pub time_ms: u64,
    /// Cells scored
    pub nodes: u64,
}

/// Computer opponent.
///
/// Holds the shared line registry, the heuristic weights and its own RNG.
/// A seeded engine makes Rookie picks reproducible.
pub struct AIEngine {
    registry: Arc<TopologyRegistry>,
    weights: Weights,
    player: Mark,
    rng: ChaCha8Rng,
}

impl AIEngine {
    /// Engine seeded from the thread RNG
    pub fn new(registry: Arc<TopologyRegistry>, ai: &AiConfig) -> Result<Self> {
        let rng = ChaCha8Rng::from_rng(&mut rand::rng());
        Self::build(registry, ai, rng)
    }

    /// Engine with a fixed seed
    pub fn with_seed(registry: Arc<TopologyRegistry>, ai: &AiConfig, seed: u64) -> Result<Self> {
        Self::build(registry, ai, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(registry: Arc<TopologyRegistry>, ai: &AiConfig, rng: ChaCha8Rng) -> Result<Self> {
        Ok(Self {
            registry,
            weights: Weights::from(ai),
            player: ai.player()?,
            rng,
        })
    }

    /// Mark the engine plays
    #[inline]
    pub fn player(&self) -> Mark {
        self.player
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TopologyRegistry> {
        &self.registry
    }

    #[inline]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Choose a move for the engine's player.
    ///
    /// Fails with [`Error::InvariantViolation`] when no cell is eligible or
    /// the occupancy does not match the registry's boards.
    pub fn select_move(
        &mut self,
        occupancy: &Occupancy,
        blocked: &CellSet,
        difficulty: Difficulty,
    ) -> Result<GlobalPos> {
        self.select_move_with_stats(occupancy, blocked, difficulty)
            .map(|r| r.best_move)
    }

    /// [`select_move`](Self::select_move) with statistics
    pub fn select_move_with_stats(
        &mut self,
        occupancy: &Occupancy,
        blocked: &CellSet,
        difficulty: Difficulty,
    ) -> Result<MoveResult> {
        let start = Instant::now();
        self.check_shape(occupancy)?;

        let eligible = occupancy.eligible(blocked);
        if eligible.is_empty() {
            return Err(Error::invariant(
                "select_move called with no eligible cell",
            ));
        }

        let mut scratch = occupancy.clone();
        let (best_move, score, kind, nodes) = match difficulty {
            Difficulty::Rookie => self.rookie(&mut scratch, &eligible),
            Difficulty::Elite => self.elite(&mut scratch, &eligible),
            Difficulty::Godlike => self.godlike(&mut scratch, &eligible),
        };

        let result = MoveResult {
            best_move,
            score,
            kind,
            difficulty,
            time_ms: start.elapsed().as_millis() as u64,
            nodes,
        };
        debug!(
            %difficulty,
            pos = %result.best_move,
            score = result.score,
            kind = ?result.kind,
            nodes = result.nodes,
            time_ms = result.time_ms,
            "AI move selected"
        );
        Ok(result)
    }

    fn check_shape(&self, occupancy: &Occupancy) -> Result<()> {
        let topologies = self.registry.topologies();
        if occupancy.boards().len() != topologies.len() {
            return Err(Error::invariant(format!(
                "occupancy has {} boards, registry has {}",
                occupancy.boards().len(),
                topologies.len()
            )));
        }
        for (id, (board, topo)) in occupancy.boards().iter().zip(topologies).enumerate() {
            let expected = (
                topo.extent(Axis::X),
                topo.extent(Axis::Y),
                topo.extent(Axis::Z),
            );
            if board.dims() != expected {
                return Err(Error::invariant(format!(
                    "board {id} is {:?}, topology expects {expected:?}",
                    board.dims()
                )));
            }
        }
        Ok(())
    }

    fn rookie(
        &mut self,
        scratch: &mut Occupancy,
        eligible: &[GlobalPos],
    ) -> (GlobalPos, i64, SelectionKind, u64) {
        let eval = WinEvaluator::new(&self.registry);
        let winners: Vec<GlobalPos> = eligible
            .iter()
            .copied()
            .filter(|&pos| eval.completions_if_played(scratch, pos, self.player) > 0)
            .collect();
        let nodes = eligible.len() as u64;

        if winners.is_empty() {
            let pos = eligible[self.rng.random_range(0..eligible.len())];
            (pos, 0, SelectionKind::Random, nodes)
        } else {
            let pos = winners[self.rng.random_range(0..winners.len())];
            (pos, 0, SelectionKind::ImmediateWin, nodes)
        }
    }

    fn elite(
        &self,
        scratch: &mut Occupancy,
        eligible: &[GlobalPos],
    ) -> (GlobalPos, i64, SelectionKind, u64) {
        let eval = WinEvaluator::new(&self.registry);
        let scored = eligible.iter().map(|&pos| {
            let cell = score_cell(&eval, scratch, pos, self.player, &self.weights);
            trace!(%pos, score = cell.score, completes = cell.completes, denies = cell.denies, "candidate");
            cell
        });

        match pick_best(scored, |c| c.score) {
            Some(best) => {
                let kind = if best.is_winning() {
                    SelectionKind::ImmediateWin
                } else {
                    SelectionKind::Heuristic
                };
                (best.pos, best.score, kind, eligible.len() as u64)
            }
            // eligible is non-empty
            None => (eligible[0], 0, SelectionKind::Heuristic, 0),
        }
    }

    fn godlike(
        &self,
        scratch: &mut Occupancy,
        eligible: &[GlobalPos],
    ) -> (GlobalPos, i64, SelectionKind, u64) {
        let eval = WinEvaluator::new(&self.registry);
        let mut nodes = 0u64;
        let scored = eligible
            .iter()
            .map(|&pos| {
                let s = score_with_reply(&eval, scratch, eligible, pos, self.player, &self.weights);
                trace!(%pos, score = s.score, own = s.own.score, "candidate with reply");
                s
            })
            .inspect(|s| nodes += s.nodes);

        match pick_best(scored, |s| s.score) {
            Some(best) => {
                let kind = if best.own.is_winning() {
                    SelectionKind::ImmediateWin
                } else {
                    SelectionKind::Lookahead
                };
                (best.own.pos, best.score, kind, nodes)
            }
            None => (eligible[0], 0, SelectionKind::Lookahead, nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn engine(seed: u64) -> AIEngine {
        let config = GameConfig::default();
        let registry = Arc::new(config.registry().unwrap());
        AIEngine::with_seed(registry, &config.ai, seed).unwrap()
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Rookie".parse::<Difficulty>().unwrap(), Difficulty::Rookie);
        assert_eq!(" godlike ".parse::<Difficulty>().unwrap(), Difficulty::Godlike);
        assert_eq!("MEDIUM".parse::<Difficulty>().unwrap(), Difficulty::Elite);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Godlike);
        let err = "Nightmare".parse::<Difficulty>().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_difficulty_display_round_trips() {
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>().unwrap(), d);
        }
    }

    #[test]
    fn test_rookie_always_takes_winning_cell() {
        let mut ai = engine(1);
        let mut occ = ai.registry().empty_occupancy();
        for x in 0..3 {
            occ.set(GlobalPos::new(1, x, 2, 3), Mark::O);
        }
        occ.set(GlobalPos::new(0, 0, 0, 0), Mark::X);
        let blocked = CellSet::new();

        for _ in 0..50 {
            let r = ai
                .select_move_with_stats(&occ, &blocked, Difficulty::Rookie)
                .unwrap();
            assert_eq!(r.kind, SelectionKind::ImmediateWin);
            let mut after = occ.clone();
            after.set(r.best_move, Mark::O);
            let eval = WinEvaluator::new(ai.registry());
            assert!(eval.has_won(&after, Mark::O));
        }
    }

    #[test]
    fn test_rookie_random_stays_eligible() {
        let mut ai = engine(99);
        let mut occ = ai.registry().empty_occupancy();
        let mut blocked = CellSet::new();
        for x in 0..4 {
            for y in 0..4 {
                occ.set(GlobalPos::new(0, x, y, 0), if (x + y) % 2 == 0 { Mark::X } else { Mark::O });
                blocked.insert(GlobalPos::new(1, x, y, 1));
            }
        }

        for _ in 0..200 {
            let pos = ai.select_move(&occ, &blocked, Difficulty::Rookie).unwrap();
            assert!(occ.is_empty_at(pos));
            assert!(!blocked.contains(pos));
        }
    }

    #[test]
    fn test_seeded_rookie_is_reproducible() {
        let occ = engine(0).registry().empty_occupancy();
        let blocked = CellSet::new();
        let picks = |seed| {
            let mut ai = engine(seed);
            (0..10)
                .map(|_| ai.select_move(&occ, &blocked, Difficulty::Rookie).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_elite_tie_break_is_deterministic() {
        let config = GameConfig::default();
        let registry = Arc::new(config.registry().unwrap());
        let occ = registry.empty_occupancy();
        let blocked = CellSet::new();

        let mut a = AIEngine::with_seed(Arc::clone(&registry), &config.ai, 1).unwrap();
        let mut b = AIEngine::with_seed(registry, &config.ai, 2).unwrap();
        for d in [Difficulty::Elite, Difficulty::Godlike] {
            let first = a.select_move(&occ, &blocked, d).unwrap();
            for _ in 0..3 {
                assert_eq!(a.select_move(&occ, &blocked, d).unwrap(), first);
                assert_eq!(b.select_move(&occ, &blocked, d).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_elite_ties_resolve_to_lowest_position() {
        let config = GameConfig::default();
        // Positional weight off: every empty cell scores zero
        let ai_config = AiConfig {
            positional_weight: 0,
            ..config.ai.clone()
        };
        let registry = Arc::new(config.registry().unwrap());
        let mut ai = AIEngine::with_seed(registry, &ai_config, 0).unwrap();
        let mut occ = ai.registry().empty_occupancy();
        occ.set(GlobalPos::new(0, 0, 0, 0), Mark::X);

        let pos = ai.select_move(&occ, &CellSet::new(), Difficulty::Elite).unwrap();
        assert_eq!(pos, GlobalPos::new(0, 0, 0, 1));
    }

    #[test]
    fn test_elite_blocks_opponent_threat() {
        let mut ai = engine(0);
        let mut occ = ai.registry().empty_occupancy();
        for z in 0..3 {
            occ.set(GlobalPos::new(0, 2, 1, z), Mark::X);
        }
        occ.set(GlobalPos::new(1, 0, 0, 0), Mark::O);
        let r = ai
            .select_move_with_stats(&occ, &CellSet::new(), Difficulty::Elite)
            .unwrap();
        assert_eq!(r.best_move, GlobalPos::new(0, 2, 1, 3));
        assert_eq!(r.kind, SelectionKind::Heuristic);
    }

    #[test]
    fn test_blocked_winning_cell_is_skipped() {
        let mut ai = engine(0);
        let mut occ = ai.registry().empty_occupancy();
        for y in 0..3 {
            occ.set(GlobalPos::new(0, 0, y, 0), Mark::O);
        }
        let blocked: CellSet = [GlobalPos::new(0, 0, 3, 0)].into_iter().collect();
        for d in Difficulty::ALL {
            let pos = ai.select_move(&occ, &blocked, d).unwrap();
            assert_ne!(pos, GlobalPos::new(0, 0, 3, 0));
        }
    }

    #[test]
    fn test_no_eligible_cell_is_invariant_violation() {
        // Two 1x1x1 boards filled by X and O
        let config = GameConfig::default();
        let registry = Arc::new(
            TopologyRegistry::new(
                vec![
                    crate::rules::Topology::euclidean(1).unwrap(),
                    crate::rules::Topology::euclidean(1).unwrap(),
                ],
                1,
            )
            .unwrap(),
        );
        let mut ai = AIEngine::with_seed(registry, &config.ai, 0).unwrap();
        let mut occ = ai.registry().empty_occupancy();
        occ.set(GlobalPos::new(0, 0, 0, 0), Mark::X);
        occ.set(GlobalPos::new(1, 0, 0, 0), Mark::O);

        for d in Difficulty::ALL {
            let err = ai.select_move(&occ, &CellSet::new(), d).unwrap_err();
            assert!(matches!(err, Error::InvariantViolation { .. }));
        }
    }

    #[test]
    fn test_mismatched_occupancy_rejected() {
        let mut ai = engine(0);
        let occ = Occupancy::new(vec![crate::board::Board::new(4, 4, 4)]);
        let err = ai
            .select_move(&occ, &CellSet::new(), Difficulty::Elite)
            .unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }

    #[test]
    fn test_same_cell_count_different_shape_rejected() {
        let mut ai = engine(0);
        let occ = Occupancy::new(vec![
            crate::board::Board::new(2, 8, 4),
            crate::board::Board::new(4, 4, 4),
        ]);
        let err = ai
            .select_move(&occ, &CellSet::new(), Difficulty::Elite)
            .unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }

    #[test]
    fn test_real_occupancy_untouched() {
        let mut ai = engine(5);
        let mut occ = ai.registry().empty_occupancy();
        occ.set(GlobalPos::new(0, 1, 1, 1), Mark::X);
        occ.set(GlobalPos::new(1, 2, 2, 2), Mark::O);
        let before = occ.clone();
        for d in Difficulty::ALL {
            let _ = ai.select_move(&occ, &CellSet::new(), d).unwrap();
            assert_eq!(occ, before);
        }
    }
}
