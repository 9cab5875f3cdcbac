use super::{
    BOARD_WIDTH,
    shape::{ShapeKind, ShapeMatrix},
};

/// A shape in one of its four facings.
///
/// Pieces are immutable values: rotation produces a new piece and leaves the
/// original untouched, so a caller can rotate, test for collision and discard.
///
/// # Example
///
/// ```
/// use versus_engine::{Piece, ShapeKind};
///
/// let piece = Piece::new(ShapeKind::T);
/// let rotated = piece.rotated_clockwise();
/// assert_eq!(rotated.facing(), 1);
/// assert_eq!(piece.facing(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: ShapeKind,
    matrix: ShapeMatrix,
    facing: u8,
}

impl Piece {
    #[must_use]
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            matrix: kind.matrix(),
            facing: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Number of clockwise quarter turns from the spawn facing (0 to 3).
    #[must_use]
    pub fn facing(&self) -> u8 {
        self.facing
    }

    #[must_use]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    /// Side length of the bounding box.
    #[must_use]
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            kind: self.kind,
            matrix: self.matrix.rotate_clockwise(),
            facing: (self.facing + 1) % 4,
        }
    }

    /// Returns this piece turned `turns` times clockwise.
    #[must_use]
    pub fn rotated_times(&self, turns: u8) -> Self {
        (0..turns).fold(*self, |piece, _| piece.rotated_clockwise())
    }
}

/// The falling piece of one board, with the position of its bounding box.
///
/// `y` may be negative while a tall piece is entering the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    piece: Piece,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Spawns `kind` centred on the top row: `x = WIDTH/2 - size/2`, `y = 0`.
    #[must_use]
    pub fn spawn(kind: ShapeKind) -> Self {
        let piece = Piece::new(kind);
        #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let x = (BOARD_WIDTH / 2 - piece.size() / 2) as i32;
        Self { piece, x, y: 0 }
    }

    #[must_use]
    pub const fn new(piece: Piece, x: i32, y: i32) -> Self {
        Self { piece, x, y }
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.piece.kind()
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            piece: self.piece.rotated_clockwise(),
            ..*self
        }
    }

    /// Absolute `(x, y)` of every filled cell. Cells may lie outside the board.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.piece
            .matrix()
            .filled_cells()
            .into_iter()
            .map(|(col, row)| (self.x + offset(col), self.y + offset(row)))
    }
}

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) const fn offset(n: usize) -> i32 {
    n as i32
}
