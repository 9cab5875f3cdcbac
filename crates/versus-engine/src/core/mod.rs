//! Board and piece model shared by both players.
//!
//! - [`Board`] - fixed 10×20 grid with collision test, placement and row compaction
//! - [`ShapeKind`] / [`ShapeMatrix`] - the 7 regular shapes plus the special star
//! - [`Piece`] / [`ActivePiece`] - a shape in a given facing, and its position on a board
//!
//! Coordinates are `(x, y)` with row 0 at the top. An [`ActivePiece`] origin is
//! the top-left corner of its bounding box and may sit above the board.

pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;

/// Number of columns on a board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on a board.
pub const BOARD_HEIGHT: usize = 20;
