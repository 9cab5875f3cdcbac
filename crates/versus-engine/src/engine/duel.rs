use std::time::Duration;

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{
    config::{ConfigError, DuelConfig},
    planner::{CursorStep, MovePlan, MovePlanner, PlanCursor},
    player::{Player, PlayerSession},
    rules,
    scheduler::{Scheduler, TimerHandle, TimerKey},
    spawner::{DuelSeed, ShapeSpawner},
};
use crate::{PieceCollisionError, core::ShapeKind};

/// Input accepted from the rendering/input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    Restart,
}

/// Result of a finished duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Player),
    Tie,
}

impl Outcome {
    /// Strictly higher score wins; equal scores tie.
    #[must_use]
    pub fn decide(human_score: u64, ai_score: u64) -> Self {
        match human_score.cmp(&ai_score) {
            std::cmp::Ordering::Greater => Self::Winner(Player::Human),
            std::cmp::Ordering::Less => Self::Winner(Player::Ai),
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    /// Created but not started.
    Ready,
    Running,
    Paused,
    Over(Outcome),
}

/// Result of one fall tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FallOutcome {
    /// The duel is not running; nothing happened.
    Halted,
    /// The piece moved down one row.
    Moved,
    /// The piece locked, `cleared` rows were removed and the next piece spawned.
    Locked { cleared: usize },
    /// The piece locked but the next piece could not spawn.
    GameOver { cleared: usize },
}

/// Notable state changes, drained by the collaborator to show status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DuelEvent {
    Started,
    GiftGranted {
        from: Player,
        to: Player,
        shape: ShapeKind,
    },
    BonusConsumed {
        player: Player,
    },
    SlowdownStarted {
        player: Player,
    },
    SlowdownEnded {
        player: Player,
    },
    SpecialPieceQueued {
        player: Player,
    },
    PaletteAlternated,
    PaletteRestored,
    Paused,
    Resumed,
    Restarted,
    GameOver {
        outcome: Outcome,
        human_score: u64,
        ai_score: u64,
    },
}

/// Two boards, one human and one AI, sharing scoring rules and timed effects.
///
/// All state changes run on a single thread. Time is virtual and driven by
/// the caller through [`Duel::advance`] (or [`Duel::fire_timer`] for a
/// specific timer); every tick is a named timer in an internal [`Scheduler`],
/// so pausing and restarting cancel by handle and never leave duplicates.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use versus_engine::{Board, Duel, DuelConfig, MovePlan, MovePlanner, Piece, Player};
///
/// #[derive(Debug)]
/// struct StayPut;
///
/// impl MovePlanner for StayPut {
///     fn plan(&mut self, _board: &Board, _piece: &Piece) -> MovePlan {
///         MovePlan { target_x: 4, rotations: 0 }
///     }
/// }
///
/// let mut duel = Duel::new(DuelConfig::default(), Box::new(StayPut)).unwrap();
/// duel.start();
/// duel.advance(Duration::from_secs(1));
/// assert!(duel.phase().is_running());
/// assert_eq!(duel.player(Player::Human).score().score(), 0);
/// ```
#[derive(Debug)]
pub struct Duel {
    config: DuelConfig,
    seed: DuelSeed,
    players: [PlayerSession; 2],
    spawners: [ShapeSpawner; 2],
    planner: Box<dyn MovePlanner>,
    ai_cursor: Option<PlanCursor>,
    scheduler: Scheduler,
    phase: DuelPhase,
    alt_palette: bool,
    frozen_effects: Vec<(TimerKey, Duration)>,
    round_started_at: Duration,
    events: Vec<DuelEvent>,
}

const fn spawner_salt(player: Player) -> u8 {
    match player {
        Player::Human => 0x01,
        Player::Ai => 0x02,
    }
}

impl Duel {
    pub fn new(config: DuelConfig, planner: Box<dyn MovePlanner>) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let session = PlayerSession::new(config.initial_fall_interval(), config.slowdown_factor);
        Ok(Self {
            seed,
            players: [session.clone(), session],
            spawners: Player::ALL.map(|p| ShapeSpawner::with_seed(seed.derive(spawner_salt(p)))),
            planner,
            ai_cursor: None,
            scheduler: Scheduler::new(),
            phase: DuelPhase::Ready,
            alt_palette: false,
            frozen_effects: Vec::new(),
            round_started_at: Duration::ZERO,
            events: Vec::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> DuelSeed {
        self.seed
    }

    #[must_use]
    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            DuelPhase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn player(&self, player: Player) -> &PlayerSession {
        &self.players[player.index()]
    }

    #[must_use]
    pub fn alt_palette(&self) -> bool {
        self.alt_palette
    }

    /// Virtual time since the duel was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Virtual time since the current round started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.now().saturating_sub(self.round_started_at)
    }

    /// Deadline of the earliest pending timer, in virtual time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    #[must_use]
    pub fn timer_handle(&self, key: TimerKey) -> Option<TimerHandle> {
        self.scheduler.handle(key)
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The plan the AI is executing for its current piece.
    #[must_use]
    pub fn ai_plan(&self) -> Option<MovePlan> {
        self.ai_cursor.map(|cursor| cursor.plan())
    }

    /// Takes every event recorded since the previous call.
    ///
    /// Events accumulate until drained, so a long-running caller must drain
    /// them regularly.
    pub fn drain_events(&mut self) -> Vec<DuelEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: DuelEvent) {
        self.events.push(event);
    }

    /// Spawns the first pieces and starts every timer. Only valid once, from `Ready`.
    pub fn start(&mut self) -> bool {
        if !self.phase.is_ready() {
            return false;
        }
        self.phase = DuelPhase::Running;
        self.round_started_at = self.scheduler.now();
        info!(seed = %self.seed, "duel started");
        self.emit(DuelEvent::Started);
        for player in Player::ALL {
            if !self.spawn(player) {
                self.finish();
                return true;
            }
        }
        self.schedule_ticks();
        self.scheduler
            .schedule(TimerKey::PaletteStart, self.config.palette_interval());
        true
    }

    /// Resets both boards, scores, timers and flags, then starts a new round.
    ///
    /// Every pending timer is cancelled, so handles taken before the restart
    /// are stale and firing them does nothing.
    pub fn restart(&mut self) -> bool {
        if self.phase.is_ready() {
            return false;
        }
        self.scheduler.cancel_all();
        self.frozen_effects.clear();
        for session in &mut self.players {
            session.reset();
        }
        self.ai_cursor = None;
        self.alt_palette = false;
        self.phase = DuelPhase::Ready;
        info!("duel restarted");
        self.emit(DuelEvent::Restarted);
        self.start()
    }

    /// Pauses a running duel or resumes a paused one.
    ///
    /// Pausing cancels every timer. Effect timers keep their remaining delay;
    /// on resume they are rescheduled with it, and exactly one fresh tick is
    /// started per board (plus the AI move tick if its plan is unfinished).
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            DuelPhase::Running => {
                self.frozen_effects = self
                    .scheduler
                    .cancel_all()
                    .into_iter()
                    .filter(|(key, _)| key.is_effect())
                    .collect();
                self.phase = DuelPhase::Paused;
                info!("duel paused");
                self.emit(DuelEvent::Paused);
                true
            }
            DuelPhase::Paused => {
                self.phase = DuelPhase::Running;
                for (key, delay) in std::mem::take(&mut self.frozen_effects) {
                    self.scheduler.schedule(key, delay);
                }
                self.schedule_ticks();
                info!("duel resumed");
                self.emit(DuelEvent::Resumed);
                true
            }
            DuelPhase::Ready | DuelPhase::Over(_) => false,
        }
    }

    /// Applies one input to `player`'s board. Returns whether any state changed.
    ///
    /// Movement commands need a running duel. `TogglePause` also resumes a
    /// paused duel and `Restart` works in any phase after the first start.
    pub fn apply_input(&mut self, player: Player, command: Command) -> bool {
        let movement: fn(&mut PlayerSession) -> Result<(), PieceCollisionError> = match command {
            Command::TogglePause => return self.toggle_pause(),
            Command::Restart => return self.restart(),
            Command::MoveLeft => PlayerSession::try_move_left,
            Command::MoveRight => PlayerSession::try_move_right,
            Command::SoftDrop => PlayerSession::try_soft_drop,
            Command::Rotate => PlayerSession::try_rotate,
            Command::HardDrop => PlayerSession::hard_drop,
        };
        if !self.phase.is_running() {
            return false;
        }
        movement(&mut self.players[player.index()]).is_ok()
    }

    /// Performs one fall tick for `player`: move down, or lock, score and spawn.
    ///
    /// Does not reschedule the board's fall timer.
    pub fn advance_fall(&mut self, player: Player) -> FallOutcome {
        if !self.phase.is_running() {
            return FallOutcome::Halted;
        }
        self.step_fall(player)
    }

    /// Performs one AI approach step. Returns whether the AI piece changed.
    pub fn advance_ai_move(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        self.step_ai().changed
    }

    /// Advances virtual time by `elapsed`, firing every timer that falls due
    /// in deadline order. Returns the number of timers fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.advance_until(self.scheduler.now() + elapsed)
    }

    /// Like [`Self::advance`], with an absolute virtual time.
    pub fn advance_until(&mut self, time: Duration) -> usize {
        let mut fired = 0;
        while let Some(handle) = self.scheduler.pop_due(time) {
            self.dispatch(handle.key());
            fired += 1;
        }
        self.scheduler.advance_to(time);
        fired
    }

    /// Fires one specific timer now. Returns `false` if the handle is stale.
    pub fn fire_timer(&mut self, handle: TimerHandle) -> bool {
        if !self.scheduler.claim(handle) {
            trace!(key = ?handle.key(), "ignoring stale timer");
            return false;
        }
        self.dispatch(handle.key());
        true
    }

    fn dispatch(&mut self, key: TimerKey) {
        match key {
            TimerKey::Fall(player) => {
                if !self.phase.is_running() {
                    return;
                }
                self.step_fall(player);
                if self.phase.is_running() {
                    let interval = self.players[player.index()].fall_interval();
                    self.scheduler.schedule(key, interval);
                }
            }
            TimerKey::AiMove => {
                if !self.phase.is_running() {
                    return;
                }
                let step = self.step_ai();
                if !step.complete {
                    self.scheduler.schedule(key, self.config.ai_move_delay());
                }
            }
            TimerKey::SlowdownExpiry(player) => {
                if self.players[player.index()].set_slowed(false) {
                    info!(player = player.label(), "slowdown ended");
                    self.emit(DuelEvent::SlowdownEnded { player });
                }
            }
            TimerKey::PaletteStart => {
                if self.phase.is_over() {
                    return;
                }
                self.alt_palette = true;
                info!("alternate palette on");
                self.emit(DuelEvent::PaletteAlternated);
                self.scheduler
                    .schedule(TimerKey::PaletteEnd, self.config.palette_duration());
                self.scheduler
                    .schedule(TimerKey::PaletteStart, self.config.palette_interval());
            }
            TimerKey::PaletteEnd => {
                self.alt_palette = false;
                info!("alternate palette off");
                self.emit(DuelEvent::PaletteRestored);
            }
        }
    }

    /// Starts one fall tick per board and the AI move tick if needed.
    fn schedule_ticks(&mut self) {
        for player in Player::ALL {
            let interval = self.players[player.index()].fall_interval();
            self.scheduler.schedule(TimerKey::Fall(player), interval);
        }
        self.schedule_ai_move();
    }

    fn schedule_ai_move(&mut self) {
        let ai = &self.players[Player::Ai.index()];
        if self.phase.is_running()
            && let Some(cursor) = &self.ai_cursor
            && !cursor.is_complete(ai)
        {
            self.scheduler
                .schedule(TimerKey::AiMove, self.config.ai_move_delay());
        }
    }

    fn step_fall(&mut self, player: Player) -> FallOutcome {
        let session = &mut self.players[player.index()];
        if session.try_soft_drop().is_ok() {
            return FallOutcome::Moved;
        }
        let Some(cleared) = session.lock_active() else {
            return FallOutcome::Halted;
        };
        debug!(player = player.label(), cleared, "piece locked");
        self.apply_rules(player, cleared);
        if self.spawn(player) {
            FallOutcome::Locked { cleared }
        } else {
            self.finish();
            FallOutcome::GameOver { cleared }
        }
    }

    fn step_ai(&mut self) -> CursorStep {
        let Some(cursor) = self.ai_cursor.as_mut() else {
            return CursorStep {
                changed: false,
                complete: true,
            };
        };
        cursor.step(&mut self.players[Player::Ai.index()])
    }

    fn apply_rules(&mut self, player: Player, cleared: usize) {
        let [human, ai] = &mut self.players;
        let (scorer, opponent) = match player {
            Player::Human => (human, ai),
            Player::Ai => (ai, human),
        };
        let effects = rules::resolve_line_clear(scorer.score_mut(), opponent.score_mut(), cleared);
        if effects.points > 0 {
            debug!(
                player = player.label(),
                points = effects.points,
                score = effects.new_score,
                "score updated"
            );
        }

        if effects.bonus_consumed {
            info!(player = player.label(), "special bonus consumed");
            self.emit(DuelEvent::BonusConsumed { player });
        }

        if effects.gift_to_opponent {
            let to = player.opponent();
            let shape = self.spawners[to.index()].next_easy();
            self.players[to.index()].set_spawn_override(shape);
            info!(from = player.label(), to = to.label(), shape = %shape.as_char(), "gift granted");
            self.emit(DuelEvent::GiftGranted {
                from: player,
                to,
                shape,
            });
        }

        if effects.slowdown {
            self.start_slowdown(player);
        }

        if effects.special_piece {
            self.players[player.index()].set_spawn_override(ShapeKind::Special);
            info!(player = player.label(), "special piece queued");
            self.emit(DuelEvent::SpecialPieceQueued { player });
        }
    }

    /// Slows `player`'s board. A slowdown while already slowed only extends it.
    fn start_slowdown(&mut self, player: Player) {
        if self.players[player.index()].set_slowed(true) {
            info!(player = player.label(), "slowdown started");
            self.emit(DuelEvent::SlowdownStarted { player });
        }
        self.scheduler.schedule(
            TimerKey::SlowdownExpiry(player),
            self.config.slowdown_duration(),
        );
    }

    /// Spawns the next piece for `player`. Returns `false` if the spawn was blocked.
    fn spawn(&mut self, player: Player) -> bool {
        let spawner = &mut self.spawners[player.index()];
        let session = &mut self.players[player.index()];
        match session.spawn_next(|| spawner.next_regular()) {
            Ok(kind) => {
                debug!(player = player.label(), shape = %kind.as_char(), "piece spawned");
                if player == Player::Ai {
                    self.plan_ai();
                }
                true
            }
            Err(err) => {
                info!(player = player.label(), %err, "spawn blocked");
                false
            }
        }
    }

    fn plan_ai(&mut self) {
        let session = &self.players[Player::Ai.index()];
        let planner = &mut self.planner;
        self.ai_cursor = session.active().map(|active| {
            let plan = planner.plan(session.board(), active.piece());
            trace!(target_x = plan.target_x, rotations = plan.rotations, "ai plan");
            PlanCursor::new(plan)
        });
        self.schedule_ai_move();
    }

    fn finish(&mut self) {
        let human_score = self.players[Player::Human.index()].score().score();
        let ai_score = self.players[Player::Ai.index()].score().score();
        let outcome = Outcome::decide(human_score, ai_score);
        self.scheduler.cancel_all();
        self.frozen_effects.clear();
        self.ai_cursor = None;
        self.alt_palette = false;
        self.phase = DuelPhase::Over(outcome);
        info!(?outcome, human_score, ai_score, "game over");
        self.emit(DuelEvent::GameOver {
            outcome,
            human_score,
            ai_score,
        });
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self, player: Player) -> &mut PlayerSession {
        &mut self.players[player.index()]
    }
}
