use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use versus_engine::PlayerSnapshot;

use super::style;

pub struct PlayerStatsDisplay<'a> {
    player: &'a PlayerSnapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PlayerStatsDisplay<'a> {
    pub fn new(player: &'a PlayerSnapshot) -> Self {
        Self {
            player,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        16 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&PlayerSnapshot) -> String),
    LabelValue(&'static str, &'static dyn Fn(&PlayerSnapshot) -> String),
    /// Highlighted line shown only while the predicate holds.
    Flag(&'static str, &'static dyn Fn(&PlayerSnapshot) -> bool),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|player| player.score.to_string()),
    Row::Empty,
    Row::LabelValue("LINES:", &|player| player.lines_cleared.to_string()),
    Row::LabelValue("PIECES:", &|player| player.pieces_locked.to_string()),
    Row::LabelValue("FALL:", &|player| format!("{}ms", player.fall_interval_ms)),
    Row::LabelValue("NEXT:", &|player| {
        player
            .pending_spawn_override
            .map_or_else(|| "?".to_owned(), |kind| kind.as_char().to_string())
    }),
    Row::Empty,
    Row::Flag("SLOWED", &|player| player.slowed),
    Row::Flag("BONUS +100", &|player| player.special_bonus_pending),
];

impl Widget for PlayerStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.player), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.player), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
                Row::Flag(label, active) => {
                    if active(self.player) {
                        Line::styled(label, style::HIGHLIGHT)
                            .centered()
                            .render(area, buf);
                    }
                }
            }
        }
    }
}
