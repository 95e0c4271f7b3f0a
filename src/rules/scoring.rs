//! Points awarded for completed lines

use crate::config::ScoringConfig;

use super::win::{ClassifiedLine, LineClass, WinReport};

/// Points for a single completed line
pub fn line_points(line: &ClassifiedLine, scoring: &ScoringConfig) -> u32 {
    let mut points = scoring.line;
    let cross = line.class == LineClass::CrossBoard;
    if cross {
        points = points.saturating_add(
            scoring
                .diagonal_3d
                .saturating_mul(scoring.cross_board_multiplier),
        );
    }
    if line.varies_depth && (!cross || scoring.stack_depth_bonus_on_cross_board) {
        points = points.saturating_add(scoring.diagonal_3d);
    }
    points
}

/// Total points for every line in `report`, saturating at `u32::MAX`. Zero
/// when nothing is complete.
pub fn score_report(report: &WinReport, scoring: &ScoringConfig) -> u32 {
    report
        .lines
        .iter()
        .map(|line| line_points(line, scoring))
        .fold(0, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GlobalPos, Mark};

    fn line(class: LineClass, varies_depth: bool) -> ClassifiedLine {
        ClassifiedLine {
            line_id: 0,
            positions: vec![GlobalPos::new(0, 0, 0, 0)],
            class,
            varies_depth,
        }
    }

    #[test]
    fn test_standard_line_base_only() {
        let scoring = ScoringConfig::default();
        assert_eq!(line_points(&line(LineClass::Standard, false), &scoring), 10);
    }

    #[test]
    fn test_diagonal_3d_bonus() {
        let scoring = ScoringConfig::default();
        assert_eq!(line_points(&line(LineClass::Diagonal3D, true), &scoring), 60);
    }

    #[test]
    fn test_cross_board_double_weight() {
        let scoring = ScoringConfig::default();
        // Flat cross-board line: base + 2 * diagonal bonus
        assert_eq!(line_points(&line(LineClass::CrossBoard, false), &scoring), 110);
        // Depth-changing cross-board line stacks the depth bonus
        assert_eq!(line_points(&line(LineClass::CrossBoard, true), &scoring), 160);
    }

    #[test]
    fn test_exclusive_bonus_when_stacking_disabled() {
        let scoring = ScoringConfig {
            stack_depth_bonus_on_cross_board: false,
            ..ScoringConfig::default()
        };
        assert_eq!(line_points(&line(LineClass::CrossBoard, true), &scoring), 110);
        assert_eq!(line_points(&line(LineClass::Diagonal3D, true), &scoring), 60);
    }

    #[test]
    fn test_report_sums_lines() {
        let scoring = ScoringConfig::default();
        let report = WinReport {
            winner: Some(Mark::X),
            lines: vec![
                line(LineClass::Standard, false),
                line(LineClass::Diagonal3D, true),
            ],
        };
        assert_eq!(score_report(&report, &scoring), 70);
        assert_eq!(score_report(&WinReport::default(), &scoring), 0);
    }

    #[test]
    fn test_oversized_weights_saturate() {
        let scoring = ScoringConfig {
            line: u32::MAX - 5,
            diagonal_3d: u32::MAX / 2 + 1,
            cross_board_multiplier: 4,
            ..ScoringConfig::default()
        };
        assert_eq!(line_points(&line(LineClass::CrossBoard, true), &scoring), u32::MAX);
        let report = WinReport {
            winner: Some(Mark::X),
            lines: vec![line(LineClass::Standard, false); 3],
        };
        assert_eq!(score_report(&report, &scoring), u32::MAX);
    }
}
