use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::event::TuiEvent;

/// Produces ticks at a fixed interval, redraws after any state change (at most
/// once per frame interval) and terminal events in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    frame_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(tick_interval: Duration, frame_interval: Duration) -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(frame_interval).unwrap_or(now);
        Self {
            tick_interval,
            frame_interval,
            last_tick: now,
            last_render: past_time,
            dirty: true,
        }
    }

    /// Blocks until the next tick, redraw or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if now.duration_since(self.last_tick) >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if !event::poll(self.timeout(now))? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn timeout(&self, now: Instant) -> Duration {
        let next_tick_at = self.last_tick + self.tick_interval;
        let next_render_at = self
            .dirty
            .then(|| self.last_render + self.frame_interval);
        let next_at = next_render_at.map_or(next_tick_at, |at| at.min(next_tick_at));
        next_at.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_render_is_immediate() {
        let events = EventLoop::new(Duration::from_secs(1), Duration::from_millis(16));
        assert_eq!(events.timeout(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_clean_loop_waits_for_tick() {
        let mut events = EventLoop::new(Duration::from_secs(10), Duration::from_millis(16));
        events.dirty = false;
        let timeout = events.timeout(events.last_tick);
        assert_eq!(timeout, Duration::from_secs(10));
    }
}
