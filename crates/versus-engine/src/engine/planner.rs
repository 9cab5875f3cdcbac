use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::PlayerSession;
use crate::core::{Board, Piece};

/// Target placement chosen for a freshly spawned piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovePlan {
    /// Column of the bounding box origin once the piece is in place.
    pub target_x: i32,
    /// Clockwise quarter turns from the spawn facing (0 to 3).
    pub rotations: u8,
}

/// Chooses where a newly spawned piece should go.
///
/// Called once per spawned piece of the planned board, with the board as it
/// is before the piece lands and the piece in its spawn facing.
pub trait MovePlanner: fmt::Debug + Send {
    fn plan(&mut self, board: &Board, piece: &Piece) -> MovePlan;
}

/// Result of one plan execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorStep {
    /// The live piece moved or rotated.
    pub changed: bool,
    /// Nothing is left to do for this piece.
    pub complete: bool,
}

/// Walks a live piece towards a [`MovePlan`], one rotation and one column per step.
///
/// A blocked rotation abandons the remaining rotations; a blocked horizontal
/// move abandons the horizontal approach. The piece then stays where it is
/// and keeps falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanCursor {
    plan: MovePlan,
    rotations_done: u8,
    rotation_abandoned: bool,
    horizontal_blocked: bool,
}

impl PlanCursor {
    #[must_use]
    pub fn new(plan: MovePlan) -> Self {
        Self {
            plan,
            rotations_done: 0,
            rotation_abandoned: false,
            horizontal_blocked: false,
        }
    }

    #[must_use]
    pub fn plan(&self) -> MovePlan {
        self.plan
    }

    fn rotation_pending(&self) -> bool {
        !self.rotation_abandoned && self.rotations_done < self.plan.rotations
    }

    fn horizontal_pending(&self, x: i32) -> bool {
        !self.horizontal_blocked && x != self.plan.target_x
    }

    /// Returns `true` if no further step would change anything for the current piece.
    #[must_use]
    pub fn is_complete(&self, session: &PlayerSession) -> bool {
        match session.active() {
            Some(active) => !self.rotation_pending() && !self.horizontal_pending(active.x()),
            None => true,
        }
    }

    /// Performs one step on the session's active piece.
    pub fn step(&mut self, session: &mut PlayerSession) -> CursorStep {
        let Some(active) = session.active() else {
            return CursorStep {
                changed: false,
                complete: true,
            };
        };
        let x = active.x();
        let mut changed = false;

        if self.rotation_pending() {
            if session.try_rotate().is_ok() {
                self.rotations_done += 1;
                changed = true;
            } else {
                self.rotation_abandoned = true;
            }
        }

        if self.horizontal_pending(x) {
            let moved = if self.plan.target_x < x {
                session.try_move_left()
            } else {
                session.try_move_right()
            };
            if moved.is_ok() {
                changed = true;
            } else {
                self.horizontal_blocked = true;
            }
        }

        CursorStep {
            changed,
            complete: self.is_complete(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ShapeKind;

    fn spawned(kind: ShapeKind, board: &str) -> PlayerSession {
        let mut session = PlayerSession::new(Duration::from_millis(400), 0.8);
        *session.board_mut() = Board::from_ascii(board).unwrap();
        session.spawn_next(|| kind).unwrap();
        session
    }

    #[test]
    fn test_one_rotation_and_one_column_per_step() {
        let mut session = spawned(ShapeKind::T, "");
        let mut cursor = PlanCursor::new(MovePlan {
            target_x: 1,
            rotations: 2,
        });

        let step = cursor.step(&mut session);
        assert!(step.changed && !step.complete);
        let active = *session.active().unwrap();
        assert_eq!((active.x(), active.piece().facing()), (3, 1));

        let step = cursor.step(&mut session);
        assert!(step.changed && !step.complete);
        let active = *session.active().unwrap();
        assert_eq!((active.x(), active.piece().facing()), (2, 2));

        let step = cursor.step(&mut session);
        assert!(step.changed && step.complete);
        assert_eq!(session.active().unwrap().x(), 1);

        let step = cursor.step(&mut session);
        assert_eq!(step, CursorStep { changed: false, complete: true });
    }

    #[test]
    fn test_blocked_rotation_is_abandoned() {
        let mut session = spawned(ShapeKind::I, &".....Z....\n".repeat(18));
        let mut cursor = PlanCursor::new(MovePlan {
            target_x: 3,
            rotations: 1,
        });
        let step = cursor.step(&mut session);
        assert!(!step.changed);
        assert!(step.complete);
        assert_eq!(session.active().unwrap().piece().facing(), 0);
    }

    #[test]
    fn test_blocked_move_stops_horizontal_approach() {
        let mut session = spawned(ShapeKind::O, &"..Z.......\n".repeat(20));
        let mut cursor = PlanCursor::new(MovePlan {
            target_x: 0,
            rotations: 0,
        });
        assert!(cursor.step(&mut session).changed);
        assert_eq!(session.active().unwrap().x(), 3);
        let step = cursor.step(&mut session);
        assert!(!step.changed);
        assert!(step.complete);
        assert_eq!(session.active().unwrap().x(), 3);
    }

    #[test]
    fn test_no_active_piece_is_complete() {
        let mut session = PlayerSession::new(Duration::from_millis(400), 0.8);
        let mut cursor = PlanCursor::new(MovePlan {
            target_x: 0,
            rotations: 3,
        });
        assert!(cursor.is_complete(&session));
        assert!(cursor.step(&mut session).complete);
    }
}
