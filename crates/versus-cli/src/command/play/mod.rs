use std::path::PathBuf;

use tracing::Level;

use self::app::PlayApp;
use super::DuelArg;
use crate::{
    tui::Runner,
    util::{self, LogTarget},
};

mod app;

const TICK_RATE: f64 = 60.0;
const FRAME_RATE: f64 = 60.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    duel: DuelArg,
    /// Write logs to this file; nothing is logged without it
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Minimum level of logged records
    #[clap(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            duel: DuelArg::default(),
            log_file: None,
            log_level: Level::INFO,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        duel,
        log_file,
        log_level,
    } = arg;

    // The terminal belongs to the UI, so logs only ever go to a file.
    let target = log_file
        .as_deref()
        .map_or(LogTarget::Discard, LogTarget::File);
    util::init_logging(*log_level, target)?;

    let mut duel = duel.build_duel()?;
    duel.start();

    let mut app = PlayApp::new(duel);
    Runner::new(TICK_RATE, FRAME_RATE).run(&mut app)?;

    Ok(())
}
