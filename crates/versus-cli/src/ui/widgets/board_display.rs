use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use versus_engine::{ActivePieceView, BOARD_HEIGHT, BOARD_WIDTH, Board, Cell};

use super::{BlockDisplay, style::Palette};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    active: Option<&'a ActivePieceView>,
    show_ghost: bool,
    palette: Palette,
    block: Option<BlockWidget<'a>>,
}

#[derive(Debug, Clone, Copy)]
enum Shade {
    Board(Cell),
    Ghost,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            active: None,
            show_ghost: false,
            palette: Palette::Primary,
            block: None,
        }
    }

    pub fn active_piece(self, active: Option<&'a ActivePieceView>) -> Self {
        Self { active, ..self }
    }

    pub fn ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn palette(self, palette: Palette) -> Self {
        Self { palette, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn shades(&self) -> [[Shade; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut shades = [[Shade::Board(Cell::Empty); BOARD_WIDTH]; BOARD_HEIGHT];
        for (row, cells) in iter::zip(&mut shades, self.board.rows()) {
            for (shade, cell) in iter::zip(row, cells) {
                *shade = Shade::Board(*cell);
            }
        }
        let Some(active) = self.active else {
            return shades;
        };
        let mut paint = |(x, y): (i32, i32), shade: Shade| {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < BOARD_WIDTH
                && y < BOARD_HEIGHT
            {
                shades[y][x] = shade;
            }
        };
        if self.show_ghost {
            for pos in active.landing_cells() {
                paint(pos, Shade::Ghost);
            }
        }
        for &pos in &active.cells {
            paint(pos, Shade::Board(Cell::Filled(active.kind)));
        }
        shades
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ BOARD_HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ BOARD_WIDTH }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.shades()) {
            for (grid_cell, shade) in iter::zip(grid_row, row) {
                let block_display = match shade {
                    Shade::Board(cell) => BlockDisplay::from_cell(cell, self.palette),
                    Shade::Ghost => BlockDisplay::ghost(),
                };
                block_display.render(grid_cell, buf);
            }
        }
    }
}
