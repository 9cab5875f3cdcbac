use std::{
    io,
    time::{Duration, Instant},
};

use super::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] on the terminal until it asks to exit.
#[derive(Debug)]
pub struct Runner {
    events: EventLoop,
}

impl Runner {
    /// Creates a runner updating `tick_rate` times and drawing at most
    /// `frame_rate` times per second.
    pub fn new(tick_rate: f64, frame_rate: f64) -> Self {
        Self {
            events: EventLoop::new(
                Duration::from_secs_f64(1.0 / tick_rate),
                Duration::from_secs_f64(1.0 / frame_rate),
            ),
        }
    }

    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            let mut last_update = Instant::now();
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        let now = Instant::now();
                        app.update(now - last_update);
                        last_update = now;
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&event),
                }
            }
            Ok(())
        })
    }
}
