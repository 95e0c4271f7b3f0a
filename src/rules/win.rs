//! Win detection over the combined board space
//!
//! A line is completed by a player when every one of its positions holds
//! that player's mark. The evaluator is a pure read of the occupancy it is
//! given; the hypothetical helpers used by the AI restore the cell they
//! touch before returning.

use crate::board::{CellSet, GlobalPos, Mark, Occupancy};

use super::registry::{TopologyRegistry, WinningLine};

/// Bonus category of a completed line, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineClass {
    /// Positions span more than one board
    CrossBoard,
    /// Single board, depth (z) changes along the line
    Diagonal3D,
    /// Axis-aligned or planar line within one depth layer
    Standard,
}

/// A completed line together with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Index into [`TopologyRegistry::all_lines`]
    pub line_id: usize,
    pub positions: Vec<GlobalPos>,
    pub class: LineClass,
    /// Independent of `class`: a cross-board line may also change depth
    pub varies_depth: bool,
}

/// Result of evaluating one player
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WinReport {
    /// The queried player if at least one line is complete
    pub winner: Option<Mark>,
    pub lines: Vec<ClassifiedLine>,
}

impl WinReport {
    #[inline]
    pub fn is_win(&self) -> bool {
        self.winner.is_some()
    }

    /// Every position on a completed line
    pub fn winning_cells(&self) -> CellSet {
        self.lines
            .iter()
            .flat_map(|l| l.positions.iter().copied())
            .collect()
    }

    pub fn count(&self, class: LineClass) -> usize {
        self.lines.iter().filter(|l| l.class == class).count()
    }
}

/// Classify a line by its geometry alone
pub fn classify(line: &WinningLine) -> LineClass {
    if line.is_cross_board() {
        LineClass::CrossBoard
    } else if line.varies_depth() {
        LineClass::Diagonal3D
    } else {
        LineClass::Standard
    }
}

/// Read-only win oracle over a registry's lines.
#[derive(Debug, Clone, Copy)]
pub struct WinEvaluator<'a> {
    registry: &'a TopologyRegistry,
}

impl<'a> WinEvaluator<'a> {
    pub fn new(registry: &'a TopologyRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub fn registry(&self) -> &'a TopologyRegistry {
        self.registry
    }

    /// Every position of `line` holds `player`
    #[inline]
    pub fn is_completed(&self, occupancy: &Occupancy, line: &WinningLine, player: Mark) -> bool {
        if !player.is_player() {
            return false;
        }
        line.masks().iter().all(|(board, mask)| {
            occupancy
                .board(*board)
                .and_then(|b| b.stones(player))
                .is_some_and(|stones| stones.contains_all(mask))
        })
    }

    /// No position of `line` holds the opponent of `player`
    #[inline]
    pub fn is_open(&self, occupancy: &Occupancy, line: &WinningLine, player: Mark) -> bool {
        let opponent = player.opponent();
        line.masks().iter().all(|(board, mask)| {
            occupancy
                .board(*board)
                .and_then(|b| b.stones(opponent))
                .map_or(true, |stones| !stones.intersects(mask))
        })
    }

    /// Report every line completed by `player`, in registry order.
    #[must_use]
    pub fn evaluate(&self, occupancy: &Occupancy, player: Mark) -> WinReport {
        let lines: Vec<ClassifiedLine> = self
            .registry
            .all_lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_completed(occupancy, line, player))
            .map(|(line_id, line)| ClassifiedLine {
                line_id,
                positions: line.positions().to_vec(),
                class: classify(line),
                varies_depth: line.varies_depth(),
            })
            .collect();

        WinReport {
            winner: (!lines.is_empty()).then_some(player),
            lines,
        }
    }

    /// True if `player` has completed any line
    pub fn has_won(&self, occupancy: &Occupancy, player: Mark) -> bool {
        self.registry
            .all_lines()
            .iter()
            .any(|line| self.is_completed(occupancy, line, player))
    }

    /// Lines through `pos` completed by `player`
    pub fn completed_through(&self, occupancy: &Occupancy, pos: GlobalPos, player: Mark) -> usize {
        self.registry
            .lines_through(pos)
            .iter()
            .filter(|&&id| self.is_completed(occupancy, self.registry.line(id), player))
            .count()
    }

    /// Lines through `pos` still winnable by `player`
    pub fn open_through(&self, occupancy: &Occupancy, pos: GlobalPos, player: Mark) -> usize {
        self.registry
            .lines_through(pos)
            .iter()
            .filter(|&&id| self.is_open(occupancy, self.registry.line(id), player))
            .count()
    }

    /// Lines `player` would complete by marking `pos`.
    ///
    /// Writes the mark into `scratch`, counts, and restores the previous mark.
    pub fn completions_if_played(
        &self,
        scratch: &mut Occupancy,
        pos: GlobalPos,
        player: Mark,
    ) -> usize {
        let prev = scratch.set(pos, player);
        let completed = self.completed_through(scratch, pos, player);
        scratch.set(pos, prev);
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::topology::Topology;

    fn registry() -> TopologyRegistry {
        TopologyRegistry::new(
            vec![
                Topology::euclidean(4).unwrap(),
                Topology::new(4, 4, 4, [true, true, false]).unwrap(),
            ],
            4,
        )
        .unwrap()
    }

    fn place(occ: &mut Occupancy, cells: &[(u8, u8, u8, u8)], mark: Mark) {
        for &(b, x, y, z) in cells {
            occ.set(GlobalPos::new(b, x, y, z), mark);
        }
    }

    #[test]
    fn test_empty_board_no_winner() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let occ = reg.empty_occupancy();
        let report = eval.evaluate(&occ, Mark::X);
        assert_eq!(report.winner, None);
        assert!(report.lines.is_empty());
        assert!(!eval.has_won(&occ, Mark::O));
    }

    #[test]
    fn test_standard_row_win() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(
            &mut occ,
            &[(0, 0, 0, 0), (0, 1, 0, 0), (0, 2, 0, 0), (0, 3, 0, 0)],
            Mark::X,
        );

        let report = eval.evaluate(&occ, Mark::X);
        assert_eq!(report.winner, Some(Mark::X));
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].class, LineClass::Standard);
        assert!(!report.lines[0].varies_depth);
        assert!(!eval.evaluate(&occ, Mark::O).is_win());
    }

    #[test]
    fn test_opponent_cell_breaks_line() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(&mut occ, &[(0, 0, 0, 0), (0, 1, 0, 0), (0, 2, 0, 0)], Mark::X);
        place(&mut occ, &[(0, 3, 0, 0)], Mark::O);
        assert!(!eval.has_won(&occ, Mark::X));
    }

    #[test]
    fn test_space_diagonal_classified_3d() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(
            &mut occ,
            &[(0, 0, 0, 0), (0, 1, 1, 1), (0, 2, 2, 2), (0, 3, 3, 3)],
            Mark::O,
        );
        let report = eval.evaluate(&occ, Mark::O);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].class, LineClass::Diagonal3D);
    }

    #[test]
    fn test_cross_board_line_classified() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(
            &mut occ,
            &[(0, 1, 1, 1), (1, 1, 1, 1), (0, 1, 1, 2), (1, 1, 1, 2)],
            Mark::X,
        );
        let report = eval.evaluate(&occ, Mark::X);
        assert_eq!(report.winner, Some(Mark::X));
        assert_eq!(report.lines.len(), 1);
        let line = &report.lines[0];
        assert_eq!(line.class, LineClass::CrossBoard);
        assert!(line.varies_depth);
        assert_eq!(report.count(LineClass::CrossBoard), 1);
    }

    #[test]
    fn test_wrapped_line_detected_only_on_torus() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let wrapped = [(3, 0, 0), (0, 1, 0), (1, 2, 0), (2, 3, 0)];

        let mut flat = reg.empty_occupancy();
        let mut round = reg.empty_occupancy();
        for (x, y, z) in wrapped {
            flat.set(GlobalPos::new(0, x, y, z), Mark::X);
            round.set(GlobalPos::new(1, x, y, z), Mark::X);
        }

        assert!(!eval.has_won(&flat, Mark::X));
        assert!(eval.has_won(&round, Mark::X));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(
            &mut occ,
            &[(1, 0, 0, 0), (1, 0, 1, 0), (1, 0, 2, 0), (1, 0, 3, 0)],
            Mark::X,
        );
        let before = occ.clone();
        let first = eval.evaluate(&occ, Mark::X);
        let second = eval.evaluate(&occ, Mark::X);
        assert_eq!(first, second);
        assert_eq!(occ, before);
    }

    #[test]
    fn test_opponent_relabeling_does_not_change_result() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(
            &mut occ,
            &[(0, 0, 0, 0), (0, 0, 0, 1), (0, 0, 0, 2), (0, 0, 0, 3)],
            Mark::X,
        );
        place(&mut occ, &[(0, 2, 2, 2), (1, 3, 3, 3)], Mark::O);
        let baseline = eval.evaluate(&occ, Mark::X);

        // Move every O somewhere else that is still not an X cell
        let mut shuffled = occ.clone();
        place(&mut shuffled, &[(0, 2, 2, 2), (1, 3, 3, 3)], Mark::Empty);
        place(&mut shuffled, &[(1, 0, 0, 0), (0, 3, 1, 2), (1, 2, 2, 2)], Mark::O);
        assert_eq!(eval.evaluate(&shuffled, Mark::X), baseline);
    }

    #[test]
    fn test_full_board_without_lines() {
        // Single layer boards keep a draw easy to lay out
        let reg = TopologyRegistry::new(
            vec![
                Topology::new(4, 4, 1, [false; 3]).unwrap(),
                Topology::new(4, 4, 1, [false; 3]).unwrap(),
            ],
            4,
        )
        .unwrap();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        // Rows alternate XXOO / OOXX / XXOO / OOXX on board 0, mirrored on board 1
        for b in 0..2u8 {
            for y in 0..4u8 {
                for x in 0..4u8 {
                    let first_pair = x < 2;
                    let even_row = y % 2 == 0;
                    let x_mark = (first_pair == even_row) != (b == 1);
                    let mark = if x_mark { Mark::X } else { Mark::O };
                    occ.set(GlobalPos::new(b, x, y, 0), mark);
                }
            }
        }
        assert!(occ.is_full());
        assert!(!eval.has_won(&occ, Mark::X));
        assert!(!eval.has_won(&occ, Mark::O));
        assert_eq!(eval.evaluate(&occ, Mark::X).winner, None);
    }

    #[test]
    fn test_completions_if_played_restores_cell() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        place(&mut occ, &[(0, 0, 0, 0), (0, 0, 1, 0), (0, 0, 2, 0)], Mark::O);
        let before = occ.clone();

        let target = GlobalPos::new(0, 0, 3, 0);
        assert_eq!(eval.completions_if_played(&mut occ, target, Mark::O), 1);
        assert_eq!(eval.completions_if_played(&mut occ, target, Mark::X), 0);
        assert_eq!(occ, before);
    }

    #[test]
    fn test_open_through_ignores_blocked_lines() {
        let reg = TopologyRegistry::new(vec![Topology::euclidean(4).unwrap()], 4).unwrap();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        let corner = GlobalPos::new(0, 0, 0, 0);
        assert_eq!(eval.open_through(&occ, corner, Mark::X), 7);

        occ.set(GlobalPos::new(0, 1, 0, 0), Mark::O);
        assert_eq!(eval.open_through(&occ, corner, Mark::X), 6);
        assert_eq!(eval.open_through(&occ, corner, Mark::O), 7);
    }

    #[test]
    fn test_winning_cells_collects_all_positions() {
        let reg = registry();
        let eval = WinEvaluator::new(&reg);
        let mut occ = reg.empty_occupancy();
        // Two lines sharing (0,0,0,0)
        place(
            &mut occ,
            &[
                (0, 0, 0, 0),
                (0, 1, 0, 0),
                (0, 2, 0, 0),
                (0, 3, 0, 0),
                (0, 0, 1, 0),
                (0, 0, 2, 0),
                (0, 0, 3, 0),
            ],
            Mark::X,
        );
        let report = eval.evaluate(&occ, Mark::X);
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.winning_cells().len(), 7);
    }
}
