use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, duel_display::*, player_stats_display::*,
};

mod block_display;
mod board_display;
mod duel_display;
mod player_stats_display;

pub(crate) mod color {
    use ratatui::style::Color;

    pub const TURQUOISE: Color = Color::Rgb(0x1A, 0xBC, 0x9C);
    pub const BLUE: Color = Color::Rgb(0x34, 0x98, 0xDB);
    pub const ORANGE: Color = Color::Rgb(0xF3, 0x9C, 0x12);
    pub const YELLOW: Color = Color::Rgb(0xF1, 0xC4, 0x0F);
    pub const GREEN: Color = Color::Rgb(0x2E, 0xCC, 0x71);
    pub const PURPLE: Color = Color::Rgb(0x9B, 0x59, 0xB6);
    pub const RED: Color = Color::Rgb(0xE7, 0x4C, 0x3C);
    pub const MAGENTA: Color = Color::Rgb(0xFF, 0x00, 0xFF);
    pub const CYAN: Color = Color::Rgb(0x00, 0xFF, 0xFF);

    pub const NAVY: Color = Color::Rgb(0x2C, 0x3E, 0x50);
    pub const GRID: Color = Color::Rgb(0x34, 0x49, 0x5E);
    pub const CLOUD: Color = Color::Rgb(0xEC, 0xF0, 0xF1);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
}

pub(crate) mod style {
    use ratatui::style::{Color, Style};
    use versus_engine::ShapeKind;

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::CLOUD, color::NAVY);
    pub const HIGHLIGHT: Style = fg_bg(color::YELLOW, color::NAVY);
    pub const EMPTY: Style = fg_bg(color::GRID, color::NAVY);
    pub const GHOST: Style = fg_bg(color::CLOUD, color::NAVY);

    /// Piece colours; the alternate set is used while the palette swap is active.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Palette {
        Primary,
        Alternate,
    }

    impl Palette {
        pub fn from_alt_flag(alt: bool) -> Self {
            if alt { Self::Alternate } else { Self::Primary }
        }

        pub const fn piece(self, kind: ShapeKind) -> Style {
            let color = match (self, kind) {
                (Self::Primary, ShapeKind::I) | (Self::Alternate, ShapeKind::T) => {
                    color::TURQUOISE
                }
                (Self::Primary, ShapeKind::J) | (Self::Alternate, ShapeKind::O) => color::BLUE,
                (Self::Primary, ShapeKind::L) | (Self::Alternate, ShapeKind::Z) => color::ORANGE,
                (Self::Primary, ShapeKind::O) | (Self::Alternate, ShapeKind::J) => color::YELLOW,
                (Self::Primary, ShapeKind::S) | (Self::Alternate, ShapeKind::L) => color::GREEN,
                (Self::Primary, ShapeKind::T) | (Self::Alternate, ShapeKind::S) => color::PURPLE,
                (Self::Primary, ShapeKind::Z) | (Self::Alternate, ShapeKind::I) => color::RED,
                (Self::Primary, ShapeKind::Special) => color::MAGENTA,
                (Self::Alternate, ShapeKind::Special) => color::CYAN,
            };
            bg_only(color)
        }
    }

}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
