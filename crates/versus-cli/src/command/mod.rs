use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::Rng as _;
use versus_ai::HeuristicPlanner;
use versus_engine::{Duel, DuelConfig, DuelSeed};

use self::{play::PlayArg, simulate::SimulateArg};
use crate::util;

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play against the AI in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless match between an autopilot and the AI
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that builds a duel.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DuelArg {
    /// Timing configuration file (JSON); missing fields use defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Seed as 32 hex digits, overriding the one in the configuration
    #[clap(long)]
    seed: Option<DuelSeed>,
}

/// Salt for the AI planner's jitter stream; the shape streams use 1 and 2.
const PLANNER_SALT: u8 = 0x03;

impl DuelArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<DuelConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<DuelConfig, _>("config", path)?,
            None => DuelConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }

    /// Builds a duel whose AI is seeded from the duel seed.
    pub(crate) fn build_duel(&self) -> anyhow::Result<Duel> {
        let mut config = self.load_config()?;
        let seed = *config.seed.get_or_insert_with(|| rand::rng().random());
        let planner = HeuristicPlanner::with_seed(seed.derive(PLANNER_SALT));
        Ok(Duel::new(config, Box::new(planner))?)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
