use serde::Serialize;

use super::{
    duel::{Duel, DuelPhase},
    player::{Player, PlayerSession},
};
use crate::core::{ActivePiece, Board, ShapeKind};

/// Read-only view of a whole duel, for rendering and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuelSnapshot {
    pub phase: DuelPhase,
    pub elapsed_ms: u64,
    pub alt_palette: bool,
    pub players: [PlayerSnapshot; 2],
}

impl DuelSnapshot {
    #[must_use]
    pub fn player(&self, player: Player) -> &PlayerSnapshot {
        &self.players[player.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub player: Player,
    pub board: Board,
    pub active: Option<ActivePieceView>,
    pub score: u64,
    pub special_bonus_pending: bool,
    pub slowed: bool,
    pub fall_interval_ms: u64,
    pub pending_spawn_override: Option<ShapeKind>,
    pub piece_serial: u64,
    pub pieces_locked: u64,
    pub lines_cleared: u64,
    pub terminal: bool,
}

/// The falling piece with its absolute cells and the row it would land on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePieceView {
    pub kind: ShapeKind,
    pub x: i32,
    pub y: i32,
    pub facing: u8,
    pub landing_y: i32,
    pub cells: Vec<(i32, i32)>,
}

impl ActivePieceView {
    fn new(active: &ActivePiece, board: &Board) -> Self {
        Self {
            kind: active.kind(),
            x: active.x(),
            y: active.y(),
            facing: active.piece().facing(),
            landing_y: board.landing_row(active.piece(), active.x(), active.y()),
            cells: active.cells().collect(),
        }
    }

    /// Cells of the piece moved down to its landing row.
    pub fn landing_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let dy = self.landing_y - self.y;
        self.cells.iter().map(move |&(x, y)| (x, y + dy))
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl PlayerSnapshot {
    fn new(player: Player, session: &PlayerSession) -> Self {
        Self {
            player,
            board: session.board().clone(),
            active: session
                .active()
                .map(|active| ActivePieceView::new(active, session.board())),
            score: session.score().score(),
            special_bonus_pending: session.score().special_bonus_pending(),
            slowed: session.is_slowed(),
            fall_interval_ms: millis(session.fall_interval()),
            pending_spawn_override: session.pending_spawn_override(),
            piece_serial: session.piece_serial(),
            pieces_locked: session.pieces_locked(),
            lines_cleared: session.lines_cleared(),
            terminal: session.is_terminal(),
        }
    }
}

impl Duel {
    /// Captures the current state of both boards and the global flags.
    #[must_use]
    pub fn snapshot(&self) -> DuelSnapshot {
        DuelSnapshot {
            phase: self.phase(),
            elapsed_ms: millis(self.elapsed()),
            alt_palette: self.alt_palette(),
            players: Player::ALL.map(|player| PlayerSnapshot::new(player, self.player(player))),
        }
    }
}
