use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

/// Application driven by [`Runner::run`](super::Runner::run).
pub trait App {
    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, event: &Event);

    /// Advances the application by the wall-clock time since the previous update.
    fn update(&mut self, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}
