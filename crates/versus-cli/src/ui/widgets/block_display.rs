use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use versus_engine::Cell;

use super::style::{self, Palette};

/// One board cell drawn as two terminal columns.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Cell, palette: Palette) -> Self {
        match cell {
            Cell::Empty => Self::new(style::EMPTY, " ."),
            Cell::Filled(kind) => Self::new(palette.piece(kind), ""),
        }
    }

    /// Landing position preview of the falling piece.
    pub fn ghost() -> Self {
        Self::new(style::GHOST, "[]")
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // A Paragraph fills the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol).style(self.style).render(area, buf);
    }
}
