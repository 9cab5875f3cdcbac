use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    PieceCollisionError, SpawnBlockedError,
    core::{ActivePiece, Board, ShapeKind},
    rules::ScoreState,
};

/// One of the two seats in a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    Human,
    Ai,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::Human, Self::Ai];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Human => 0,
            Self::Ai => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Human => Self::Ai,
            Self::Ai => Self::Human,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Ai => "AI",
        }
    }
}

/// The state of one board: grid, falling piece, fall speed, pending spawn
/// override and score.
///
/// A session knows nothing about time or about its opponent; the
/// [`Duel`](crate::Duel) drives it and applies cross-board effects.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    board: Board,
    active: Option<ActivePiece>,
    base_fall_interval: Duration,
    slowdown_factor: f64,
    slowed: bool,
    pending_spawn_override: Option<ShapeKind>,
    score: ScoreState,
    terminal: bool,
    piece_serial: u64,
    pieces_locked: u64,
    lines_cleared: u64,
}

impl PlayerSession {
    /// Creates an empty session. No piece is active until [`Self::spawn_next`].
    #[must_use]
    pub fn new(base_fall_interval: Duration, slowdown_factor: f64) -> Self {
        Self {
            board: Board::new(),
            active: None,
            base_fall_interval,
            slowdown_factor,
            slowed: false,
            pending_spawn_override: None,
            score: ScoreState::new(),
            terminal: false,
            piece_serial: 0,
            pieces_locked: 0,
            lines_cleared: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut ScoreState {
        &mut self.score
    }

    /// Current delay between fall ticks. Slowed boards fall `1 / factor` times slower.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        if self.slowed {
            scale_interval(self.base_fall_interval, self.slowdown_factor)
        } else {
            self.base_fall_interval
        }
    }

    #[must_use]
    pub fn is_slowed(&self) -> bool {
        self.slowed
    }

    /// Sets the slowed flag and returns whether it changed.
    pub fn set_slowed(&mut self, slowed: bool) -> bool {
        std::mem::replace(&mut self.slowed, slowed) != slowed
    }

    #[must_use]
    pub fn pending_spawn_override(&self) -> Option<ShapeKind> {
        self.pending_spawn_override
    }

    /// Forces the next spawn to `kind`, replacing any previous override.
    pub fn set_spawn_override(&mut self, kind: ShapeKind) {
        self.pending_spawn_override = Some(kind);
    }

    /// Number of pieces spawned so far (including a blocked final spawn).
    #[must_use]
    pub fn piece_serial(&self) -> u64 {
        self.piece_serial
    }

    #[must_use]
    pub fn pieces_locked(&self) -> u64 {
        self.pieces_locked
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    /// Returns `true` once a spawn has been blocked.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update(|piece| piece.moved(-1, 0))
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update(|piece| piece.moved(1, 0))
    }

    /// Moves the piece down one row. Never locks.
    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update(|piece| piece.moved(0, 1))
    }

    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update(ActivePiece::rotated)
    }

    /// Moves the piece straight down to its landing row. The piece is locked
    /// by the next fall tick, not here.
    ///
    /// Fails if the piece is already resting.
    pub fn hard_drop(&mut self) -> Result<(), PieceCollisionError> {
        let active = self.active.as_mut().ok_or(PieceCollisionError)?;
        let y = self
            .board
            .landing_row(active.piece(), active.x(), active.y());
        if y == active.y() {
            return Err(PieceCollisionError);
        }
        *active = active.moved(0, y - active.y());
        Ok(())
    }

    fn try_update<F>(&mut self, f: F) -> Result<(), PieceCollisionError>
    where
        F: FnOnce(&ActivePiece) -> ActivePiece,
    {
        let active = self.active.as_mut().ok_or(PieceCollisionError)?;
        let moved = f(active);
        if self.board.collides(moved.piece(), moved.x(), moved.y()) {
            return Err(PieceCollisionError);
        }
        *active = moved;
        Ok(())
    }

    /// Replaces the active piece with one produced by a plan executor.
    pub fn set_active(&mut self, piece: ActivePiece) -> Result<(), PieceCollisionError> {
        if self.active.is_none() || self.board.collides(piece.piece(), piece.x(), piece.y()) {
            return Err(PieceCollisionError);
        }
        self.active = Some(piece);
        Ok(())
    }

    /// Writes the active piece into the board and clears full rows.
    ///
    /// Returns the number of rows cleared, or `None` if no piece was active.
    pub fn lock_active(&mut self) -> Option<usize> {
        let active = self.active.take()?;
        self.board.place(active.piece(), active.x(), active.y());
        let cleared = self.board.clear_full_rows();
        self.pieces_locked += 1;
        self.lines_cleared += cleared as u64;
        Some(cleared)
    }

    /// Spawns the next piece, consuming a pending override before drawing at random.
    ///
    /// If the spawn position is already occupied the session becomes terminal
    /// and no piece is active.
    pub fn spawn_next<F>(&mut self, draw: F) -> Result<ShapeKind, SpawnBlockedError>
    where
        F: FnOnce() -> ShapeKind,
    {
        let kind = self.pending_spawn_override.take().unwrap_or_else(draw);
        let piece = ActivePiece::spawn(kind);
        self.piece_serial += 1;
        if self.board.collides(piece.piece(), piece.x(), piece.y()) {
            self.active = None;
            self.terminal = true;
            return Err(SpawnBlockedError { kind });
        }
        self.active = Some(piece);
        Ok(kind)
    }

    /// Resets everything except the configured base interval.
    pub fn reset(&mut self) {
        *self = Self::new(self.base_fall_interval, self.slowdown_factor);
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale_interval(interval: Duration, factor: f64) -> Duration {
    Duration::from_nanos((interval.as_nanos() as f64 / factor).round() as u64)
}
