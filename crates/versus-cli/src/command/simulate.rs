use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Level, debug, info};
use versus_ai::{HeuristicPlanner, Jitter};
use versus_engine::{
    ActivePiece, Command, Duel, DuelEvent, DuelSeed, MovePlanner as _, Outcome, Player,
};

use super::DuelArg;
use crate::util::{self, LogTarget, Output};

/// Salt for the autopilot's planner stream.
const AUTOPILOT_SALT: u8 = 0x04;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    duel: DuelArg,
    /// Stop after this much virtual time even if nobody has lost
    #[clap(long, default_value_t = 600)]
    max_seconds: u64,
    /// Virtual time advanced per simulation step
    #[clap(long, default_value_t = 50)]
    step_ms: u64,
    /// Output file for the match report (JSON); stdout if omitted
    #[clap(long)]
    output: Option<PathBuf>,
    /// Minimum level of records logged to stderr
    #[clap(long, default_value_t = Level::WARN)]
    log_level: Level,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        duel,
        max_seconds,
        step_ms,
        output,
        log_level,
    } = arg;

    util::init_logging(*log_level, LogTarget::Stderr)?;
    anyhow::ensure!(*step_ms > 0, "step must be at least 1 ms");

    let mut duel = duel.build_duel()?;
    let mut autopilot = Autopilot::new(duel.seed());
    let report = simulate(
        &mut duel,
        &mut autopilot,
        Duration::from_secs(*max_seconds),
        Duration::from_millis(*step_ms),
    );
    info!(
        outcome = ?report.outcome,
        human_score = report.players[0].score,
        ai_score = report.players[1].score,
        elapsed_ms = report.elapsed_ms,
        "simulation finished"
    );

    Output::save_json(&report, output.clone())?;
    Ok(())
}

/// Plays the human board with the same heuristic as the AI, placing each
/// piece as soon as it spawns.
#[derive(Debug)]
struct Autopilot {
    planner: HeuristicPlanner,
    last_serial: u64,
}

impl Autopilot {
    fn new(seed: DuelSeed) -> Self {
        Self {
            planner: HeuristicPlanner::with_seed(seed.derive(AUTOPILOT_SALT))
                .with_jitter(Jitter::Disabled),
            last_serial: 0,
        }
    }

    /// Rotates, shifts and hard-drops the human's piece if it is new.
    /// Returns whether a piece was played.
    fn play(&mut self, duel: &mut Duel) -> bool {
        let session = duel.player(Player::Human);
        let Some(active) = session.active() else {
            return false;
        };
        if session.piece_serial() == self.last_serial {
            return false;
        }
        self.last_serial = session.piece_serial();
        let plan = self.planner.plan(session.board(), active.piece());
        debug!(
            target_x = plan.target_x,
            rotations = plan.rotations,
            "autopilot plan"
        );

        for _ in 0..plan.rotations {
            if !duel.apply_input(Player::Human, Command::Rotate) {
                break;
            }
        }
        while let Some(x) = duel.player(Player::Human).active().map(ActivePiece::x)
            && x != plan.target_x
        {
            let command = if x < plan.target_x {
                Command::MoveRight
            } else {
                Command::MoveLeft
            };
            if !duel.apply_input(Player::Human, command) {
                break;
            }
        }
        duel.apply_input(Player::Human, Command::HardDrop);
        true
    }
}

#[derive(Debug, Clone, Serialize)]
struct MatchReport {
    generated_at: DateTime<Utc>,
    seed: DuelSeed,
    /// `None` if the time limit was reached first.
    outcome: Option<Outcome>,
    elapsed_ms: u64,
    palette_swaps: u64,
    players: [PlayerReport; 2],
}

#[derive(Debug, Clone, Default, Serialize)]
struct PlayerReport {
    player: Option<Player>,
    score: u64,
    lines_cleared: u64,
    pieces_locked: u64,
    gifts_received: u64,
    slowdowns: u64,
    special_pieces: u64,
    bonuses_consumed: u64,
}

impl MatchReport {
    fn new(seed: DuelSeed) -> Self {
        Self {
            generated_at: Utc::now(),
            seed,
            outcome: None,
            elapsed_ms: 0,
            palette_swaps: 0,
            players: Player::ALL.map(|player| PlayerReport {
                player: Some(player),
                ..PlayerReport::default()
            }),
        }
    }

    fn record(&mut self, event: &DuelEvent) {
        match *event {
            DuelEvent::GiftGranted { to, .. } => self.players[to.index()].gifts_received += 1,
            DuelEvent::SlowdownStarted { player } => self.players[player.index()].slowdowns += 1,
            DuelEvent::SpecialPieceQueued { player } => {
                self.players[player.index()].special_pieces += 1;
            }
            DuelEvent::BonusConsumed { player } => {
                self.players[player.index()].bonuses_consumed += 1;
            }
            DuelEvent::PaletteAlternated => self.palette_swaps += 1,
            _ => {}
        }
    }

    fn finish(&mut self, duel: &Duel) {
        self.outcome = duel.outcome();
        self.elapsed_ms = u64::try_from(duel.elapsed().as_millis()).unwrap_or(u64::MAX);
        for player in Player::ALL {
            let session = duel.player(player);
            let report = &mut self.players[player.index()];
            report.score = session.score().score();
            report.lines_cleared = session.lines_cleared();
            report.pieces_locked = session.pieces_locked();
        }
    }
}

fn simulate(
    duel: &mut Duel,
    autopilot: &mut Autopilot,
    limit: Duration,
    step: Duration,
) -> MatchReport {
    let mut report = MatchReport::new(duel.seed());
    duel.start();
    loop {
        autopilot.play(duel);
        for event in duel.drain_events() {
            report.record(&event);
        }
        if duel.phase().is_over() || duel.elapsed() >= limit {
            break;
        }
        duel.advance(step);
    }
    report.finish(duel);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "00112233445566778899aabbccddeeff";

    fn duel() -> Duel {
        DuelArg {
            config: None,
            seed: Some(SEED.parse().unwrap()),
        }
        .build_duel()
        .unwrap()
    }

    #[test]
    fn test_autopilot_plays_each_piece_once() {
        let mut duel = duel();
        duel.start();
        let mut autopilot = Autopilot::new(duel.seed());

        assert!(autopilot.play(&mut duel));
        let active = *duel.player(Player::Human).active().unwrap();
        let board = duel.player(Player::Human).board();
        assert_eq!(
            board.landing_row(active.piece(), active.x(), active.y()),
            active.y()
        );

        assert!(!autopilot.play(&mut duel));
        assert!(!duel.apply_input(Player::Human, Command::HardDrop));
    }

    #[test]
    fn test_simulation_stops_at_time_limit() {
        let mut duel = duel();
        let mut autopilot = Autopilot::new(duel.seed());
        let report = simulate(
            &mut duel,
            &mut autopilot,
            Duration::from_secs(5),
            Duration::from_millis(50),
        );

        assert_eq!(report.outcome, None);
        assert_eq!(report.elapsed_ms, 5000);
        assert!(report.players[0].pieces_locked > 0);
        assert_eq!(report.players[0].player, Some(Player::Human));
        assert_eq!(report.players[1].player, Some(Player::Ai));
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let run = || {
            let mut duel = duel();
            let mut autopilot = Autopilot::new(duel.seed());
            simulate(
                &mut duel,
                &mut autopilot,
                Duration::from_secs(120),
                Duration::from_millis(50),
            )
        };
        let (first, second) = (run(), run());
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.elapsed_ms, second.elapsed_ms);
        for (a, b) in first.players.iter().zip(&second.players) {
            assert_eq!(a.score, b.score);
            assert_eq!(a.pieces_locked, b.pieces_locked);
            assert_eq!(a.gifts_received, b.gifts_received);
        }
    }

    #[test]
    fn test_report_counts_events() {
        let mut report = MatchReport::new(SEED.parse().unwrap());
        report.record(&DuelEvent::GiftGranted {
            from: Player::Human,
            to: Player::Ai,
            shape: versus_engine::ShapeKind::O,
        });
        report.record(&DuelEvent::SlowdownStarted {
            player: Player::Human,
        });
        report.record(&DuelEvent::PaletteAlternated);
        report.record(&DuelEvent::Paused);

        assert_eq!(report.players[1].gifts_received, 1);
        assert_eq!(report.players[0].slowdowns, 1);
        assert_eq!(report.palette_swaps, 1);
        assert_eq!(report.players[0].gifts_received, 0);
    }
}
