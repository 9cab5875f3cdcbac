use arrayvec::ArrayVec;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::trace;
use versus_engine::{BOARD_WIDTH, Board, MovePlan, MovePlanner, Piece};

use crate::{BoardAnalysis, BoardEvaluator, HeuristicEvaluator};

/// Random perturbation added to every candidate score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    /// Scores are used as evaluated; the search is fully deterministic.
    Disabled,
    /// Adds a value drawn uniformly from `[-amplitude, amplitude]`.
    Uniform(f32),
}

impl Default for Jitter {
    fn default() -> Self {
        Self::Uniform(0.5)
    }
}

/// One evaluated placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub plan: MovePlan,
    /// Landing row of the piece's bounding box origin.
    pub landing_y: i32,
    /// Evaluator score, without jitter.
    pub score: f32,
}

/// Upper bound on the placements of one piece.
pub const MAX_CANDIDATES: usize = 4 * BOARD_WIDTH;

/// Exhaustive one-piece search: every facing and every column the bounding
/// box fits in, dropped straight down from the top row.
///
/// The best jittered score wins. Comparison is strictly greater, so among
/// equal scores the first candidate in search order is kept.
#[derive(Debug)]
pub struct HeuristicPlanner {
    evaluator: Box<dyn BoardEvaluator>,
    jitter: Jitter,
    rng: Pcg32,
}

impl Default for HeuristicPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicPlanner {
    /// Creates a planner with default jitter and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    #[must_use]
    pub fn with_seed(seed: [u8; 16]) -> Self {
        Self::with_rng(Pcg32::from_seed(seed))
    }

    fn with_rng(rng: Pcg32) -> Self {
        Self {
            evaluator: Box::new(HeuristicEvaluator),
            jitter: Jitter::default(),
            rng,
        }
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Box<dyn BoardEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Evaluates every placement of `piece` on `board`, in search order
    /// (facing first, then column from left to right).
    ///
    /// All four facings are searched even when some are identical.
    #[must_use]
    pub fn candidates(&self, board: &Board, piece: &Piece) -> ArrayVec<Candidate, MAX_CANDIDATES> {
        let mut candidates = ArrayVec::new();
        let mut rotated = *piece;
        for rotations in 0..4 {
            let max_x = BOARD_WIDTH.saturating_sub(rotated.size());
            for x in 0..=max_x {
                let x = i32::try_from(x).unwrap_or(i32::MAX);
                let landing_y = board.landing_row(&rotated, x, 0);
                let mut after = board.clone();
                after.place(&rotated, x, landing_y);
                let score = self.evaluator.evaluate(&BoardAnalysis::from_board(after));
                candidates.push(Candidate {
                    plan: MovePlan {
                        target_x: x,
                        rotations,
                    },
                    landing_y,
                    score,
                });
            }
            rotated = rotated.rotated_clockwise();
        }
        candidates
    }

    fn jitter(&mut self) -> f32 {
        match self.jitter {
            Jitter::Disabled => 0.0,
            Jitter::Uniform(amplitude) if amplitude > 0.0 => {
                self.rng.random_range(-amplitude..=amplitude)
            }
            Jitter::Uniform(_) => 0.0,
        }
    }

    /// Picks the best placement, or `None` if `piece` fits nowhere horizontally.
    pub fn best(&mut self, board: &Board, piece: &Piece) -> Option<Candidate> {
        let mut best: Option<(f32, Candidate)> = None;
        for candidate in self.candidates(board, piece) {
            let score = candidate.score + self.jitter();
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

impl MovePlanner for HeuristicPlanner {
    fn plan(&mut self, board: &Board, piece: &Piece) -> MovePlan {
        let Some(best) = self.best(board, piece) else {
            return MovePlan {
                target_x: 0,
                rotations: 0,
            };
        };
        trace!(
            shape = %piece.kind().as_char(),
            target_x = best.plan.target_x,
            rotations = best.plan.rotations,
            score = best.score,
            "selected placement"
        );
        best.plan
    }
}

#[cfg(test)]
mod tests {
    use versus_engine::{ActivePiece, ShapeKind};

    use super::*;

    fn deterministic() -> HeuristicPlanner {
        HeuristicPlanner::with_seed([7; 16]).with_jitter(Jitter::Disabled)
    }

    #[test]
    fn test_candidate_count_per_piece() {
        let planner = deterministic();
        let board = Board::new();
        // O: 4 facings × 9 columns; I: 4 × 7; T: 4 × 8; special: 4 × 6.
        for (kind, count) in [
            (ShapeKind::O, 36),
            (ShapeKind::I, 28),
            (ShapeKind::T, 32),
            (ShapeKind::Special, 24),
        ] {
            let candidates = planner.candidates(&board, &Piece::new(kind));
            assert_eq!(candidates.len(), count, "{kind:?}");
            assert_eq!(candidates[0].plan, MovePlan { target_x: 0, rotations: 0 });
            assert_eq!(candidates.last().unwrap().plan.rotations, 3);
        }
    }

    #[test]
    fn test_fills_notch_with_o() {
        let board = Board::from_ascii("OOOO..OOOO").unwrap();
        let mut planner = deterministic();
        let best = planner.best(&board, &Piece::new(ShapeKind::O)).unwrap();
        assert_eq!(best.plan, MovePlan { target_x: 4, rotations: 0 });
        assert_eq!(best.landing_y, 18);
        assert!((best.score - (-6.6)).abs() < 1e-4, "{}", best.score);
        assert_eq!(
            planner.plan(&board, &Piece::new(ShapeKind::O)),
            MovePlan { target_x: 4, rotations: 0 }
        );
    }

    #[derive(Debug)]
    struct RightEdgeHeight;

    impl BoardEvaluator for RightEdgeHeight {
        #[expect(clippy::cast_precision_loss)]
        fn evaluate(&self, analysis: &BoardAnalysis) -> f32 {
            analysis.column_heights()[BOARD_WIDTH - 1] as f32
        }
    }

    #[test]
    fn test_custom_evaluator_drives_choice() {
        let board = Board::from_ascii("OOOO..OOOO").unwrap();
        let mut planner = deterministic().with_evaluator(Box::new(RightEdgeHeight));
        let best = planner.best(&board, &Piece::new(ShapeKind::O)).unwrap();
        assert_eq!(best.plan, MovePlan { target_x: 8, rotations: 0 });
        assert!((best.score - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        // On an empty board the two wall placements tie, and every facing of
        // an O is identical; the unrotated one at the left wall comes first.
        let mut planner = deterministic();
        let plan = planner.plan(&Board::new(), &Piece::new(ShapeKind::O));
        assert_eq!(plan, MovePlan { target_x: 0, rotations: 0 });
    }

    #[test]
    fn test_prefers_vertical_i_for_deep_well() {
        let board = Board::from_ascii(&"OOOOOOO.OO\n".repeat(4)).unwrap();
        let mut planner = deterministic();
        let best = planner.best(&board, &Piece::new(ShapeKind::I)).unwrap();
        assert_eq!(best.plan, MovePlan { target_x: 5, rotations: 1 });
        assert_eq!(best.landing_y, 16);
        let active = ActivePiece::new(
            Piece::new(ShapeKind::I).rotated_times(best.plan.rotations),
            best.plan.target_x,
            best.landing_y,
        );
        assert!(active.cells().all(|(x, _)| x == 7));
    }

    #[test]
    fn test_edge_column_out_of_reach_for_vertical_i() {
        // The bounding box must fit, so a vertical I never reaches column 9.
        let board = Board::new();
        let planner = deterministic();
        for candidate in planner.candidates(&board, &Piece::new(ShapeKind::I)) {
            let active = ActivePiece::new(
                Piece::new(ShapeKind::I).rotated_times(candidate.plan.rotations),
                candidate.plan.target_x,
                candidate.landing_y,
            );
            if candidate.plan.rotations % 2 == 1 {
                assert!(active.cells().all(|(x, _)| x != 9));
            }
        }
    }

    #[test]
    fn test_same_seed_same_jitter() {
        let board = Board::from_ascii("OO..OO..OO").unwrap();
        let plans = |seed| {
            let mut planner = HeuristicPlanner::with_seed(seed);
            [ShapeKind::T, ShapeKind::S, ShapeKind::L]
                .map(|kind| planner.plan(&board, &Piece::new(kind)))
        };
        assert_eq!(plans([1; 16]), plans([1; 16]));
    }
}
