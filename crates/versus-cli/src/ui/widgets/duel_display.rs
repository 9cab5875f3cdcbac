use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use versus_engine::{DuelPhase, DuelSnapshot, Outcome, Player};

use super::{
    BoardDisplay, PlayerStatsDisplay, color,
    style::{self, Palette},
};

/// Both boards side by side with their stats, plus a status line.
#[derive(Debug)]
pub struct DuelDisplay<'a> {
    snapshot: &'a DuelSnapshot,
    status: Option<&'a str>,
}

impl<'a> DuelDisplay<'a> {
    pub fn new(snapshot: &'a DuelSnapshot) -> Self {
        Self {
            snapshot,
            status: None,
        }
    }

    pub fn status(self, status: Option<&'a str>) -> Self {
        Self { status, ..self }
    }

    fn border_color(&self) -> Color {
        match self.snapshot.phase {
            DuelPhase::Ready | DuelPhase::Running => color::CLOUD,
            DuelPhase::Paused => color::YELLOW,
            DuelPhase::Over(_) => color::RED,
        }
    }

    fn render_player(&self, player: Player, area: Rect, buf: &mut Buffer) -> Rect {
        let snapshot = self.snapshot.player(player);
        let border_style = self.border_color();
        let title = match player {
            Player::Human => "HUMAN",
            Player::Ai => "AI",
        };
        let board = BoardDisplay::new(&snapshot.board)
            .active_piece(snapshot.active.as_ref())
            .ghost(player == Player::Human)
            .palette(Palette::from_alt_flag(self.snapshot.alt_palette))
            .block(
                Block::bordered()
                    .title(Line::from(title).centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let stats = PlayerStatsDisplay::new(snapshot).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [board_area, stats_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(stats.width()),
        ])
        .spacing(1)
        .areas(area);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(board_area);
        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(stats_area);

        board.render(board_area, buf);
        stats.render(stats_area, buf);
        board_area
    }
}

impl Widget for DuelDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &DuelDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // board (20 + 2 border) + spacing + stats (16 + 2 padding + 2 border)
        let column_width = 22 + 1 + 20;
        let [boards_area, status_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)]).areas(area);
        let [human_area, ai_area] = Layout::horizontal([
            Constraint::Length(column_width),
            Constraint::Length(column_width),
        ])
        .flex(Flex::Center)
        .spacing(3)
        .areas(boards_area);

        let human_board = self.render_player(Player::Human, human_area, buf);
        let ai_board = self.render_player(Player::Ai, ai_area, buf);

        if let Some(status) = self.status {
            Line::styled(status, style::HIGHLIGHT)
                .centered()
                .render(status_area, buf);
        }

        let popup = match self.snapshot.phase {
            DuelPhase::Ready | DuelPhase::Running => None,
            DuelPhase::Paused => Some((
                "PAUSED",
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            DuelPhase::Over(outcome) => Some((
                match outcome {
                    Outcome::Winner(Player::Human) => "HUMAN WINS!",
                    Outcome::Winner(Player::Ai) => "AI WINS!",
                    Outcome::Tie => "TIE!",
                },
                Style::new().fg(color::CLOUD).bg(color::RED),
            )),
        };

        if let Some((text, style)) = popup {
            for board_area in [human_board, ai_board] {
                let block = Block::new().style(style);
                let text = Text::styled(text, style).centered();
                let area =
                    board_area.centered(Constraint::Length(board_area.width), Constraint::Length(3));
                let inner = block.inner(area);
                Clear.render(area, buf);
                block.render(area, buf);
                text.render(inner.centered_vertically(Constraint::Length(1)), buf);
            }
        }
    }
}
