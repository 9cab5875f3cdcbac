use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Time to advance the application.
    Tick,
    /// Time to redraw the screen.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
