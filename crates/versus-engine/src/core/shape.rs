use std::str::FromStr;

use arrayvec::ArrayVec;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// Largest bounding box of any shape (the special star is 5×5).
pub const MAX_SHAPE_SIZE: usize = 5;

/// Identifier of a piece shape.
///
/// The seven regular tetrominoes are drawn at random. [`ShapeKind::Special`]
/// only appears as a scoring reward and is never drawn at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
    #[serde(rename = "SPECIAL")]
    Special = 7,
}

/// Uniform over the seven regular shapes.
impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::REGULAR[rng.random_range(0..ShapeKind::REGULAR.len())]
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid shape kind: {input:?}")]
pub struct ParseShapeKindError {
    #[error(not(source))]
    input: String,
}

impl ShapeKind {
    /// Number of shape kinds, including the special shape.
    pub const LEN: usize = 8;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
        Self::Special,
    ];

    /// Shapes eligible for random spawns.
    pub const REGULAR: [Self; 7] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
    ];

    /// Shapes handed out as a gift to the opponent of a 2-line clear.
    pub const EASY: [Self; 2] = [Self::I, Self::O];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the character used in textual boards.
    ///
    /// ```
    /// use versus_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// assert_eq!(ShapeKind::Special.as_char(), '*');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::J => 'J',
            Self::L => 'L',
            Self::O => 'O',
            Self::S => 'S',
            Self::T => 'T',
            Self::Z => 'Z',
            Self::Special => '*',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            'O' => Some(Self::O),
            'S' => Some(Self::S),
            'T' => Some(Self::T),
            'Z' => Some(Self::Z),
            '*' => Some(Self::Special),
            _ => None,
        }
    }

    /// Returns the spawn-facing matrix of this shape.
    #[must_use]
    pub fn matrix(self) -> ShapeMatrix {
        let rows: &[&str] = match self {
            Self::I => &["....", "####", "....", "...."],
            Self::J => &["#..", "###", "..."],
            Self::L => &["..#", "###", "..."],
            Self::O => &["##", "##"],
            Self::S => &[".##", "##.", "..."],
            Self::T => &[".#.", "###", "..."],
            Self::Z => &["##.", ".##", "..."],
            Self::Special => &[".#...", "..#..", "#####", "..#..", ".#..."],
        };
        ShapeMatrix::from_rows(rows)
    }
}

impl FromStr for ShapeKind {
    type Err = ParseShapeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c.to_ascii_uppercase()),
            _ if s.eq_ignore_ascii_case("special") => Some(Self::Special),
            _ => None,
        };
        kind.ok_or_else(|| ParseShapeKindError {
            input: s.to_owned(),
        })
    }
}

/// Square boolean matrix of size N×N (2 ≤ N ≤ 5).
///
/// Indexed as `[row][col]`; only the top-left N×N corner of the backing
/// storage is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    /// Builds a matrix from rows of `#` (filled) and `.` (empty).
    ///
    /// # Panics
    ///
    /// Panics if the rows do not form a square of size 2 to 5.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        assert!(
            (2..=MAX_SHAPE_SIZE).contains(&size),
            "shape size out of range: {size}"
        );
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "shape row {r} is not {size} wide");
            for (c, ch) in row.chars().enumerate() {
                cells[r][c] = ch == '#';
            }
        }
        Self { size, cells }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Returns the `(col, row)` offsets of every filled cell, row-major.
    #[must_use]
    pub fn filled_cells(&self) -> ArrayVec<(usize, usize), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }> {
        let mut cells = ArrayVec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[row][col] {
                    cells.push((col, row));
                }
            }
        }
        cells
    }

    /// Rotates the matrix 90° clockwise: `rotated[c][n-1-r] = original[r][c]`.
    #[must_use]
    pub fn rotate_clockwise(&self) -> Self {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in self.cells.iter().enumerate().take(n) {
            for (c, &filled) in row.iter().enumerate().take(n) {
                cells[c][n - 1 - r] = filled;
            }
        }
        Self { size: n, cells }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_shape_sizes() {
        assert_eq!(ShapeKind::I.matrix().size(), 4);
        assert_eq!(ShapeKind::O.matrix().size(), 2);
        assert_eq!(ShapeKind::Special.matrix().size(), 5);
        for kind in [ShapeKind::J, ShapeKind::L, ShapeKind::S, ShapeKind::T, ShapeKind::Z] {
            assert_eq!(kind.matrix().size(), 3, "{kind:?}");
        }
    }

    #[test]
    fn test_every_shape_has_cells() {
        for kind in ShapeKind::ALL {
            let expected = if kind == ShapeKind::Special { 9 } else { 4 };
            assert_eq!(kind.matrix().filled_cells().len(), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let rotated = ShapeKind::T.matrix().rotate_clockwise();
        assert_eq!(rotated, ShapeMatrix::from_rows(&[".#.", ".##", ".#."]));
    }

    #[test]
    fn test_rotate_i_clockwise() {
        let rotated = ShapeKind::I.matrix().rotate_clockwise();
        assert_eq!(
            rotated,
            ShapeMatrix::from_rows(&["..#.", "..#.", "..#.", "..#."])
        );
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in ShapeKind::ALL {
            let original = kind.matrix();
            let mut matrix = original;
            for _ in 0..4 {
                matrix = matrix.rotate_clockwise();
            }
            assert_eq!(matrix, original, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_leaves_original_untouched() {
        let original = ShapeKind::L.matrix();
        let copy = original;
        let _ = original.rotate_clockwise();
        assert_eq!(original, copy);
    }

    #[test]
    #[should_panic(expected = "shape size out of range")]
    fn test_oversized_matrix_panics() {
        let _ = ShapeMatrix::from_rows(&["......"; 6]);
    }

    #[test]
    fn test_char_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(ShapeKind::from_char('X'), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("t".parse::<ShapeKind>().unwrap(), ShapeKind::T);
        assert_eq!("special".parse::<ShapeKind>().unwrap(), ShapeKind::Special);
        assert!("TT".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_random_never_draws_special() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; ShapeKind::LEN];
        for _ in 0..1000 {
            let kind: ShapeKind = rng.random();
            seen[kind.index()] = true;
        }
        assert!(!seen[ShapeKind::Special.index()]);
        assert!(ShapeKind::REGULAR.iter().all(|k| seen[k.index()]));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ShapeKind::Special).unwrap(),
            "\"SPECIAL\""
        );
        assert_eq!(serde_json::to_string(&ShapeKind::O).unwrap(), "\"O\"");
    }
}
