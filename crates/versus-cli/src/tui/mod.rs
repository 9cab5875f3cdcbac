//! Minimal terminal runtime: fixed-rate update ticks, throttled redraws and
//! crossterm input, all on one thread.

pub use self::{app::App, runner::Runner};

mod app;
mod event;
mod event_loop;
mod runner;
