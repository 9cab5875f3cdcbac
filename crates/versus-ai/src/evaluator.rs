use std::fmt;

use crate::BoardAnalysis;

/// Scores a board reached by a hypothetical placement (higher is better).
pub trait BoardEvaluator: fmt::Debug + Send {
    fn evaluate(&self, analysis: &BoardAnalysis) -> f32;
}

/// Fixed linear heuristic over lines, holes, bumpiness and aggregate height.
///
/// ```text
/// score = 8.0·completed_lines − 6.0·holes − 2.5·bumpiness − 0.8·aggregate_height
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    pub const COMPLETED_LINES_WEIGHT: f32 = 8.0;
    pub const HOLES_WEIGHT: f32 = -6.0;
    pub const BUMPINESS_WEIGHT: f32 = -2.5;
    pub const AGGREGATE_HEIGHT_WEIGHT: f32 = -0.8;
}

#[expect(clippy::cast_precision_loss)]
fn feature(value: usize) -> f32 {
    value as f32
}

impl BoardEvaluator for HeuristicEvaluator {
    fn evaluate(&self, analysis: &BoardAnalysis) -> f32 {
        Self::COMPLETED_LINES_WEIGHT * feature(analysis.completed_lines())
            + Self::HOLES_WEIGHT * feature(analysis.holes())
            + Self::BUMPINESS_WEIGHT * feature(analysis.bumpiness())
            + Self::AGGREGATE_HEIGHT_WEIGHT * feature(analysis.aggregate_height())
    }
}

#[cfg(test)]
mod tests {
    use versus_engine::Board;

    use super::*;

    fn evaluate(ascii: &str) -> f32 {
        HeuristicEvaluator.evaluate(&BoardAnalysis::from_board(Board::from_ascii(ascii).unwrap()))
    }

    #[test]
    fn test_empty_board_scores_zero() {
        assert!(evaluate("").abs() < f32::EPSILON);
    }

    #[test]
    fn test_weighted_sum() {
        // 1 line, 0 holes, bumpiness 2, aggregate height 12.
        let score = evaluate(
            "
            ....OO....
            OOOOOOOOOO
            ",
        );
        assert!((score - (8.0 - 5.0 - 9.6)).abs() < 1e-4, "{score}");
    }

    #[test]
    fn test_hole_is_worse_than_flat() {
        let flat = evaluate("OO........");
        let covered = evaluate(
            "
            OO........
            .O........
            ",
        );
        assert!(flat > covered);
    }
}
