use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{ActivePiece, Piece, offset},
    shape::ShapeKind,
};

/// A single board cell.
///
/// Occupied cells keep the shape that filled them so they can be drawn in
/// that shape's colour; for game logic only occupancy matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ShapeKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn kind(self) -> Option<ShapeKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        self.kind().map_or('.', ShapeKind::as_char)
    }
}

pub type BoardRow = [Cell; BOARD_WIDTH];

const EMPTY_ROW: BoardRow = [Cell::Empty; BOARD_WIDTH];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has {rows} rows, at most {BOARD_HEIGHT} allowed")]
    TooManyRows { rows: usize },
    #[display("row {row} has {width} cells, expected {BOARD_WIDTH}")]
    RowWidth { row: usize, width: usize },
    #[display("row {row} has invalid cell {ch:?}")]
    InvalidCell { row: usize, ch: char },
}

/// The fixed 10×20 playfield, row 0 at the top.
///
/// # Example
///
/// ```
/// use versus_engine::{ActivePiece, Board, ShapeKind};
///
/// let mut board = Board::new();
/// let piece = ActivePiece::spawn(ShapeKind::I);
/// let y = board.landing_row(piece.piece(), piece.x(), piece.y());
/// board.place(piece.piece(), piece.x(), y);
/// assert_eq!(board.column_heights()[3], 1);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for row in &self.rows {
            list.entry(&row_string(row));
        }
        list.finish()
    }
}

/// Serialized as one string per row, using shape characters and `.` for empty cells.
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(BOARD_HEIGHT))?;
        for row in &self.rows {
            seq.serialize_element(&row_string(row))?;
        }
        seq.end()
    }
}

fn row_string(row: &BoardRow) -> String {
    row.iter().map(|cell| cell.as_char()).collect()
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    #[must_use]
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Parses a board from text, one line per row, top to bottom.
    ///
    /// Cells are shape characters (`I`, `J`, `L`, `O`, `S`, `T`, `Z`, `*`) or `.`.
    /// Blank lines and surrounding whitespace are ignored; missing rows at the
    /// top are left empty.
    pub fn from_ascii(text: &str) -> Result<Self, ParseBoardError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > BOARD_HEIGHT {
            return Err(ParseBoardError::TooManyRows { rows: lines.len() });
        }
        let mut board = Self::new();
        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let row = top + i;
            let width = line.chars().count();
            if width != BOARD_WIDTH {
                return Err(ParseBoardError::RowWidth { row, width });
            }
            for (x, ch) in line.chars().enumerate() {
                board.rows[row][x] = match ch {
                    '.' => Cell::Empty,
                    _ => Cell::Filled(
                        ShapeKind::from_char(ch).ok_or(ParseBoardError::InvalidCell { row, ch })?,
                    ),
                };
            }
        }
        Ok(board)
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the board.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < BOARD_WIDTH && y < BOARD_HEIGHT,
            "cell ({x}, {y}) outside board"
        );
        self.rows[y][x]
    }

    /// Returns the cell at a signed position, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = to_index(x, y)?;
        Some(self.rows[y][x])
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_filled())
    }

    /// Number of fully occupied rows.
    #[must_use]
    pub fn full_row_count(&self) -> usize {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).count()
    }

    /// Returns `true` if `piece` placed with its origin at `(x, y)` overlaps
    /// a wall, the floor or an occupied cell.
    ///
    /// Cells above the board (negative row) are only checked against the side walls.
    #[must_use]
    pub fn collides(&self, piece: &Piece, x: i32, y: i32) -> bool {
        piece.matrix().filled_cells().into_iter().any(|(col, row)| {
            let (cx, cy) = (x + offset(col), y + offset(row));
            if cx < 0 || cx >= offset(BOARD_WIDTH) || cy >= offset(BOARD_HEIGHT) {
                return true;
            }
            cy >= 0 && self.cell(cx, cy).is_some_and(Cell::is_filled)
        })
    }

    /// Writes the piece's cells into the board. Cells outside the board are dropped.
    pub fn place(&mut self, piece: &Piece, x: i32, y: i32) {
        let active = ActivePiece::new(*piece, x, y);
        for (cx, cy) in active.cells() {
            if let Some((cx, cy)) = to_index(cx, cy) {
                self.rows[cy][cx] = Cell::Filled(piece.kind());
            }
        }
    }

    /// Removes every full row, shifting the rows above down, and returns the number removed.
    ///
    /// Rows are compacted bottom to top in a single pass, so non-contiguous
    /// full rows are handled together and the remaining rows keep their order.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(y) {
                count += 1;
            } else if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        for row in &mut self.rows[..count] {
            *row = EMPTY_ROW;
        }
        count
    }

    /// Height of each column: `HEIGHT - y` of its topmost filled cell, or 0 if empty.
    #[must_use]
    pub fn column_heights(&self) -> [usize; BOARD_WIDTH] {
        let mut heights = [0; BOARD_WIDTH];
        for (x, height) in heights.iter_mut().enumerate() {
            if let Some(top) = (0..BOARD_HEIGHT).find(|&y| self.rows[y][x].is_filled()) {
                *height = BOARD_HEIGHT - top;
            }
        }
        heights
    }

    /// Returns the lowest row reachable by dropping `piece` straight down from `(x, y)`.
    #[must_use]
    pub fn landing_row(&self, piece: &Piece, x: i32, mut y: i32) -> i32 {
        while !self.collides(piece, x, y + 1) {
            y += 1;
        }
        y
    }
}

fn to_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)?;
    let y = usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)?;
    Some((x, y))
}
