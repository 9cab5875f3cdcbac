//! Scoring and the score-driven rules that couple the two boards.

use serde::{Deserialize, Serialize};

pub const POINTS_PER_LINE: u64 = 50;
pub const BONUS_2_LINES: u64 = 100;
pub const BONUS_3_LINES: u64 = 200;
pub const BONUS_4_LINES: u64 = 300;
pub const SPECIAL_PIECE_BONUS: u64 = 100;

/// Every crossing of a multiple of this score slows the scorer's board down.
pub const SLOWDOWN_THRESHOLD: u64 = 1000;
/// Every crossing of a multiple of this score queues a special piece for the scorer.
pub const SPECIAL_PIECE_THRESHOLD: u64 = 3000;

/// Clearing exactly this many lines gifts the opponent an easy piece.
pub const GIFT_LINE_COUNT: usize = 2;

/// Points for clearing `lines` rows at once, without any pending bonus.
///
/// The multi-line bonus is capped at the 4-line value; only the special
/// piece can clear more than four rows.
///
/// ```
/// use versus_engine::rules::line_clear_points;
///
/// assert_eq!(line_clear_points(0), 0);
/// assert_eq!(line_clear_points(1), 50);
/// assert_eq!(line_clear_points(4), 500);
/// ```
#[must_use]
pub fn line_clear_points(lines: usize) -> u64 {
    let bonus = match lines {
        0 | 1 => 0,
        2 => BONUS_2_LINES,
        3 => BONUS_3_LINES,
        _ => BONUS_4_LINES,
    };
    lines as u64 * POINTS_PER_LINE + bonus
}

/// Returns `true` if going from `old` to `new` crosses at least one multiple of `step`.
///
/// A jump over several multiples still counts once.
#[must_use]
pub const fn crossed_boundary(old: u64, new: u64, step: u64) -> bool {
    new / step > old / step
}

/// Per-player score and the one-shot special-piece bonus flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    score: u64,
    special_bonus_pending: bool,
}

impl ScoreState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            special_bonus_pending: false,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn special_bonus_pending(&self) -> bool {
        self.special_bonus_pending
    }

    /// Arms the bonus consumed by this player's next lock.
    pub fn arm_special_bonus(&mut self) {
        self.special_bonus_pending = true;
    }

    /// Adds the points for a lock that cleared `lines` rows and consumes a
    /// pending special bonus. Returns the points added and whether the bonus was consumed.
    pub fn apply_line_clear(&mut self, lines: usize) -> (u64, bool) {
        let mut points = line_clear_points(lines);
        let bonus_consumed = std::mem::take(&mut self.special_bonus_pending);
        if bonus_consumed {
            points += SPECIAL_PIECE_BONUS;
        }
        self.score += points;
        (points, bonus_consumed)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Consequences of one lock, for the orchestrator to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEffects {
    pub points: u64,
    pub old_score: u64,
    pub new_score: u64,
    /// The scorer consumed a pending special bonus.
    pub bonus_consumed: bool,
    /// The opponent's next spawn becomes an easy shape and its bonus is armed.
    pub gift_to_opponent: bool,
    /// The scorer's board slows down.
    pub slowdown: bool,
    /// The scorer's next spawn becomes the special shape.
    pub special_piece: bool,
}

/// Runs the score rules for a lock by `scorer` that cleared `lines` rows.
///
/// Called on every lock, including locks that clear nothing, so a pending
/// bonus is always consumed by the next lock. Both threshold checks use the
/// same post-update total and may fire together.
pub fn resolve_line_clear(
    scorer: &mut ScoreState,
    opponent: &mut ScoreState,
    lines: usize,
) -> RuleEffects {
    let old_score = scorer.score();
    let (points, bonus_consumed) = scorer.apply_line_clear(lines);
    let new_score = scorer.score();

    let gift_to_opponent = lines == GIFT_LINE_COUNT;
    if gift_to_opponent {
        opponent.arm_special_bonus();
    }

    RuleEffects {
        points,
        old_score,
        new_score,
        bonus_consumed,
        gift_to_opponent,
        slowdown: crossed_boundary(old_score, new_score, SLOWDOWN_THRESHOLD),
        special_piece: crossed_boundary(old_score, new_score, SPECIAL_PIECE_THRESHOLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_score(score: u64) -> ScoreState {
        ScoreState {
            score,
            special_bonus_pending: false,
        }
    }

    #[test]
    fn test_points_per_line_count() {
        let expected = [0, 50, 200, 350, 500];
        for (lines, points) in expected.into_iter().enumerate() {
            let mut scorer = ScoreState::new();
            let mut opponent = ScoreState::new();
            let effects = resolve_line_clear(&mut scorer, &mut opponent, lines);
            assert_eq!(effects.points, points, "{lines} lines");
            assert_eq!(scorer.score(), points);
        }
    }

    #[test]
    fn test_bonus_capped_beyond_four_lines() {
        assert_eq!(line_clear_points(5), 550);
    }

    #[test]
    fn test_two_lines_gift_opponent() {
        let mut scorer = ScoreState::new();
        let mut opponent = ScoreState::new();
        let effects = resolve_line_clear(&mut scorer, &mut opponent, 2);
        assert!(effects.gift_to_opponent);
        assert!(opponent.special_bonus_pending());
        assert!(!scorer.special_bonus_pending());

        for lines in [0, 1, 3, 4] {
            let mut opponent = ScoreState::new();
            let effects = resolve_line_clear(&mut ScoreState::new(), &mut opponent, lines);
            assert!(!effects.gift_to_opponent);
            assert!(!opponent.special_bonus_pending());
        }
    }

    #[test]
    fn test_consecutive_gifts_do_not_stack_on_scorer() {
        let mut scorer = ScoreState::new();
        let mut opponent = ScoreState::new();
        resolve_line_clear(&mut scorer, &mut opponent, 2);
        let effects = resolve_line_clear(&mut scorer, &mut opponent, 2);
        assert_eq!(effects.points, 200);
        assert!(!effects.bonus_consumed);
        assert_eq!(scorer.score(), 400);
        assert!(opponent.special_bonus_pending());
    }

    #[test]
    fn test_bonus_consumed_exactly_once() {
        let mut scorer = ScoreState::new();
        let mut opponent = ScoreState::new();
        scorer.arm_special_bonus();

        let effects = resolve_line_clear(&mut scorer, &mut opponent, 0);
        assert!(effects.bonus_consumed);
        assert_eq!(effects.points, SPECIAL_PIECE_BONUS);
        assert!(!scorer.special_bonus_pending());

        let effects = resolve_line_clear(&mut scorer, &mut opponent, 1);
        assert!(!effects.bonus_consumed);
        assert_eq!(effects.points, 50);
        assert_eq!(scorer.score(), 150);
    }

    #[test]
    fn test_slowdown_threshold() {
        let mut opponent = ScoreState::new();

        let mut scorer = with_score(950);
        assert!(resolve_line_clear(&mut scorer, &mut opponent, 1).slowdown);

        let mut scorer = with_score(900);
        assert!(!resolve_line_clear(&mut scorer, &mut opponent, 1).slowdown);

        let mut scorer = with_score(1000);
        assert!(!resolve_line_clear(&mut scorer, &mut opponent, 1).slowdown);
    }

    #[test]
    fn test_multi_boundary_jump_triggers_once() {
        assert!(crossed_boundary(950, 1500, 1000));
        assert!(crossed_boundary(500, 2500, 1000));
        assert!(!crossed_boundary(1000, 1999, 1000));

        let mut scorer = with_score(800);
        scorer.arm_special_bonus();
        let effects = resolve_line_clear(&mut scorer, &mut ScoreState::new(), 4);
        assert_eq!(effects.new_score, 1400);
        assert!(effects.slowdown);
    }

    #[test]
    fn test_special_and_slowdown_fire_together() {
        let mut scorer = with_score(2900);
        let effects = resolve_line_clear(&mut scorer, &mut ScoreState::new(), 2);
        assert_eq!(effects.new_score, 3100);
        assert!(effects.slowdown);
        assert!(effects.special_piece);
    }

    #[test]
    fn test_reset() {
        let mut score = with_score(1234);
        score.arm_special_bonus();
        score.reset();
        assert_eq!(score, ScoreState::new());
    }
}
