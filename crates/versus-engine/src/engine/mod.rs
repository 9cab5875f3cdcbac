//! Duel orchestration on top of the board model.
//!
//! - [`Duel`] - owns both player sessions, the timer queue and the score rules
//! - [`PlayerSession`] - one board with its falling piece, score and fall speed
//! - [`Scheduler`] - virtual-time timer queue with stale-handle protection
//! - [`MovePlanner`] / [`PlanCursor`] - where the AI wants its piece, and how it gets there
//! - [`rules`] - scoring constants and the cross-board effects of a lock
//!
//! Nothing here reads the wall clock; a front end feeds elapsed time into
//! [`Duel::advance`] and renders [`Duel::snapshot`].

pub use self::{
    config::*, duel::*, planner::*, player::*, scheduler::*, snapshot::*, spawner::*,
};

mod config;
mod duel;
mod planner;
mod player;
pub mod rules;
mod scheduler;
mod snapshot;
mod spawner;
