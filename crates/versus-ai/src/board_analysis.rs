use std::{cell::OnceCell, iter};

use versus_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board};

/// Lazily computed surface and hole features of one board.
///
/// The board is taken as is: full rows are counted by
/// [`Self::completed_lines`] but not removed, so heights and holes describe
/// the board right after a hypothetical placement.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<[usize; BOARD_WIDTH]>,
    completed_lines: OnceCell<usize>,
    holes: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
    aggregate_height: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            completed_lines: OnceCell::new(),
            holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
            aggregate_height: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize; BOARD_WIDTH] {
        self.column_heights
            .get_or_init(|| self.board.column_heights())
    }

    #[must_use]
    pub fn completed_lines(&self) -> usize {
        *self
            .completed_lines
            .get_or_init(|| self.board.full_row_count())
    }

    /// Empty cells lying below the top filled cell of their column.
    #[must_use]
    pub fn holes(&self) -> usize {
        *self.holes.get_or_init(|| {
            iter::zip(0..BOARD_WIDTH, self.column_heights())
                .map(|(x, &height)| {
                    (BOARD_HEIGHT - height..BOARD_HEIGHT)
                        .filter(|&y| self.board.get(x, y).is_empty())
                        .count()
                })
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }
}
