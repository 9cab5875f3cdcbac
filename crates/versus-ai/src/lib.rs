//! Heuristic opponent for the versus engine.
//!
//! [`HeuristicPlanner`] tries every rotation and column for a freshly spawned
//! piece, scores each resulting board with a [`BoardEvaluator`] and hands the
//! best placement to the engine as a [`versus_engine::MovePlan`].

pub use self::{board_analysis::*, evaluator::*, planner::*};

mod board_analysis;
mod evaluator;
mod planner;
