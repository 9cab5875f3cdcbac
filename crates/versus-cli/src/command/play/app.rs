use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use versus_engine::{Command, Duel, DuelEvent, DuelPhase, Outcome, Player};

use crate::{tui::App, ui::widgets::DuelDisplay};

#[derive(Debug)]
pub struct PlayApp {
    duel: Duel,
    status: Option<String>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(duel: Duel) -> Self {
        let mut app = Self {
            duel,
            status: None,
            is_exiting: false,
        };
        app.sync_status();
        app
    }

    fn sync_status(&mut self) {
        for event in self.duel.drain_events() {
            match StatusUpdate::from_event(&event) {
                StatusUpdate::Keep => {}
                StatusUpdate::Show(text) => self.status = Some(text),
                StatusUpdate::Clear => self.status = None,
            }
        }
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        let command = match key.code {
            KeyCode::Left => Command::MoveLeft,
            KeyCode::Right => Command::MoveRight,
            KeyCode::Down => Command::SoftDrop,
            KeyCode::Up => Command::Rotate,
            KeyCode::Char(' ') => Command::HardDrop,
            KeyCode::Char('p') => Command::TogglePause,
            KeyCode::Char('r') => Command::Restart,
            KeyCode::Char('q') | KeyCode::Esc => {
                self.is_exiting = true;
                return;
            }
            _ => return,
        };
        self.duel.apply_input(Player::Human, command);
        self.sync_status();
    }

    fn update(&mut self, elapsed: Duration) {
        self.duel.advance(elapsed);
        self.sync_status();
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.duel.snapshot();
        let duel_display = DuelDisplay::new(&snapshot).status(self.status.as_deref());
        let help_text = match self.duel.phase() {
            DuelPhase::Ready | DuelPhase::Running => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Hard Drop) | P (Pause) | R (Restart) | Q (Quit)"
            }
            DuelPhase::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            DuelPhase::Over(_) => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(23), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(duel_display, main_area);
        frame.render_widget(help_text, help_area);
    }
}

/// How a duel event changes the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusUpdate {
    Keep,
    Show(String),
    Clear,
}

impl StatusUpdate {
    fn from_event(event: &DuelEvent) -> Self {
        match *event {
            DuelEvent::Started | DuelEvent::BonusConsumed { .. } => Self::Keep,
            DuelEvent::GiftGranted { to, .. } => {
                Self::Show(format!("Surprise Gift for {}!", to.label()))
            }
            DuelEvent::SlowdownStarted { player } => {
                Self::Show(format!("{} gets a Slowdown Bonus!", player.label()))
            }
            DuelEvent::SpecialPieceQueued { player } => {
                Self::Show(format!("Special Piece Coming for {}!", player.label()))
            }
            DuelEvent::PaletteAlternated => Self::Show("Color Change Activated!".to_owned()),
            DuelEvent::Paused => Self::Show("Game Paused - Press 'P' to Resume".to_owned()),
            DuelEvent::GameOver { outcome, .. } => {
                let verdict = match outcome {
                    Outcome::Winner(player) => format!("{} Wins!", player.label()),
                    Outcome::Tie => "It's a Tie!".to_owned(),
                };
                Self::Show(format!("Game Over! {verdict} Press 'R' to Restart"))
            }
            DuelEvent::SlowdownEnded { .. }
            | DuelEvent::PaletteRestored
            | DuelEvent::Resumed
            | DuelEvent::Restarted => Self::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use versus_ai::HeuristicPlanner;
    use versus_engine::{DuelConfig, ShapeKind};

    use super::*;

    fn app() -> PlayApp {
        let planner = HeuristicPlanner::with_seed([7; 16]);
        let mut duel = Duel::new(DuelConfig::default(), Box::new(planner)).unwrap();
        duel.start();
        PlayApp::new(duel)
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_status_messages() {
        let gift = DuelEvent::GiftGranted {
            from: Player::Human,
            to: Player::Ai,
            shape: ShapeKind::I,
        };
        assert_eq!(
            StatusUpdate::from_event(&gift),
            StatusUpdate::Show("Surprise Gift for AI!".to_owned())
        );
        assert_eq!(
            StatusUpdate::from_event(&DuelEvent::SlowdownStarted {
                player: Player::Human
            }),
            StatusUpdate::Show("Human gets a Slowdown Bonus!".to_owned())
        );
        assert_eq!(
            StatusUpdate::from_event(&DuelEvent::GameOver {
                outcome: Outcome::Tie,
                human_score: 0,
                ai_score: 0,
            }),
            StatusUpdate::Show("Game Over! It's a Tie! Press 'R' to Restart".to_owned())
        );
        assert_eq!(
            StatusUpdate::from_event(&DuelEvent::BonusConsumed { player: Player::Ai }),
            StatusUpdate::Keep
        );
        assert_eq!(
            StatusUpdate::from_event(&DuelEvent::Resumed),
            StatusUpdate::Clear
        );
    }

    #[test]
    fn test_pause_key_sets_and_clears_status() {
        let mut app = app();
        assert_eq!(app.status, None);

        press(&mut app, KeyCode::Char('p'));
        assert!(app.duel.phase().is_paused());
        assert_eq!(
            app.status.as_deref(),
            Some("Game Paused - Press 'P' to Resume")
        );

        press(&mut app, KeyCode::Char('p'));
        assert!(app.duel.phase().is_running());
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_keys_move_human_piece() {
        let mut app = app();
        let x = app.duel.player(Player::Human).active().unwrap().x();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.duel.player(Player::Human).active().unwrap().x(), x - 1);
        assert!(!app.should_exit());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_update_advances_duel() {
        let mut app = app();
        app.update(Duration::from_millis(1500));
        assert_eq!(app.duel.elapsed(), Duration::from_millis(1500));
    }
}
