//! Simulation engine.
//!
//! `SimulationEngine` owns the roster and every piece of session state,
//! applies player commands, runs the tick systems in a fixed order and
//! produces `GameStateSnapshot`s. It has no clock: the host asks the
//! scheduler what to arm and calls back with the generation it armed.
//! Completely headless, so sessions are deterministic for a given seed and
//! command sequence.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use watershed_core::commands::PlayerCommand;
use watershed_core::components::{BaseHealth, TowerStats, UpgradeState};
use watershed_core::config::ConfigError;
use watershed_core::enums::{GamePhase, UpgradeKind};
use watershed_core::events::GameEvent;
use watershed_core::state::GameStateSnapshot;
use watershed_core::types::{SimTime, Surface};

pub use watershed_core::config::SimConfig;

use crate::economy::{self, Ledger, PurchaseError};
use crate::progression::{self, Progression, TickOutcome};
use crate::roster::Roster;
use crate::scheduler::{Schedule, TickScheduler};
use crate::systems;
use crate::systems::pickups::PickupTimers;
use crate::systems::snapshot::SessionView;

/// Why a command was rejected. A rejected command leaves the session as it
/// was.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error("command not valid while {0:?}")]
    InvalidPhase(GamePhase),
    #[error("invalid surface: {0}")]
    InvalidSurface(#[from] ConfigError),
}

/// The simulation engine. Owns the roster and all session state.
pub struct SimulationEngine {
    config: SimConfig,
    rng: ChaCha8Rng,
    roster: Roster,
    ledger: Ledger,
    stats: TowerStats,
    base_health: BaseHealth,
    upgrades: UpgradeState,
    progression: Progression,
    pickup_timers: PickupTimers,
    scheduler: TickScheduler,
    phase: GamePhase,
    time: SimTime,
    speed_index: usize,
    auto_advance: bool,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine without validating `config`. Use [`Self::try_new`]
    /// for configuration from outside the program.
    pub fn new(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let pickup_timers = PickupTimers::new(&mut rng);
        Self {
            auto_advance: config.auto_advance,
            config,
            rng,
            roster: Roster::new(),
            ledger: Ledger::default(),
            stats: TowerStats::default(),
            base_health: BaseHealth::default(),
            upgrades: UpgradeState::default(),
            progression: Progression::default(),
            pickup_timers,
            scheduler: TickScheduler::default(),
            phase: GamePhase::default(),
            time: SimTime::default(),
            speed_index: 0,
            events: Vec::new(),
        }
    }

    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Apply a player command immediately.
    pub fn execute(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        let result = self.handle_command(&command);
        if let Err(err) = &result {
            debug!(?command, %err, "command rejected");
        }
        result
    }

    /// Apply several commands in order, stopping at the first rejection.
    pub fn execute_all(
        &mut self,
        commands: impl IntoIterator<Item = PlayerCommand>,
    ) -> Result<(), CommandError> {
        commands.into_iter().try_for_each(|c| self.execute(c))
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    /// Outside `Running` nothing moves.
    pub fn tick(&mut self) -> GameStateSnapshot {
        if self.phase == GamePhase::Running {
            self.run_systems();
            self.time.advance();
        }
        self.snapshot()
    }

    /// Tick on behalf of a host timer armed for `generation`. A stale or
    /// non-repeating generation is dropped and returns `None`.
    pub fn tick_for(&mut self, generation: u64) -> Option<GameStateSnapshot> {
        if self.scheduler.is_current(generation) && self.scheduler.period_ms().is_some() {
            Some(self.tick())
        } else {
            trace!(generation, current = self.scheduler.generation(), "stale tick dropped");
            None
        }
    }

    /// Called by the host once the auto-advance delay armed for
    /// `generation` has elapsed. Advances only if the level is still
    /// cleared and auto-advance is still on. Returns whether it advanced.
    pub fn fire_pending_advance(&mut self, generation: u64) -> bool {
        let pending = matches!(self.scheduler.schedule(), Schedule::AdvancePending { .. });
        if self.phase != GamePhase::LevelCleared
            || !pending
            || !self.scheduler.is_current(generation)
            || !self.auto_advance
        {
            return false;
        }
        self.advance_level();
        true
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let session = SessionView {
            time: self.time,
            phase: self.phase,
            progression: &self.progression,
            ledger: &self.ledger,
            stats: &self.stats,
            base_health: &self.base_health,
            upgrades: &self.upgrades,
            speed_multiplier: self.speed_multiplier(),
            tick_period_ms: self.scheduler.period_ms(),
            auto_advance: self.auto_advance,
        };
        systems::snapshot::build_snapshot(&self.roster, &session, events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn tower_stats(&self) -> &TowerStats {
        &self.stats
    }

    pub fn upgrades(&self) -> &UpgradeState {
        &self.upgrades
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    /// The user speed multiplier currently selected.
    pub fn speed_multiplier(&self) -> f64 {
        self.config
            .speed_levels
            .get(self.speed_index)
            .copied()
            .unwrap_or(1.0)
    }

    /// Tick period implied by the current tower speed and multiplier.
    pub fn tick_period(&self) -> f64 {
        TickScheduler::period_for(
            self.config.base_tick_delay_ms,
            self.stats.speed,
            self.speed_multiplier(),
        )
    }

    #[cfg(test)]
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    #[cfg(test)]
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    #[cfg(test)]
    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), CommandError> {
        match *command {
            PlayerCommand::StartGame => {
                if !matches!(self.phase, GamePhase::Idle | GamePhase::Ended) {
                    return Err(CommandError::InvalidPhase(self.phase));
                }
                self.start_game();
            }
            PlayerCommand::Restart => self.start_game(),
            PlayerCommand::AdvanceLevel => {
                if self.phase != GamePhase::LevelCleared {
                    return Err(CommandError::InvalidPhase(self.phase));
                }
                self.advance_level();
            }
            PlayerCommand::BuyUpgrade { upgrade } => {
                self.require_active_game()?;
                economy::buy_upgrade(
                    &mut self.ledger,
                    &mut self.stats,
                    &mut self.base_health,
                    &mut self.roster,
                    upgrade,
                )?;
                debug!(?upgrade, coins = self.ledger.coins(), "upgrade bought");
                if upgrade == UpgradeKind::Speed {
                    self.rearm();
                }
            }
            PlayerCommand::BuyPermanent { upgrade } => {
                self.require_active_game()?;
                economy::buy_permanent(
                    &mut self.ledger,
                    &mut self.upgrades,
                    &mut self.base_health,
                    &mut self.roster,
                    self.progression.level,
                    upgrade,
                )?;
                info!(?upgrade, coins = self.ledger.coins(), "permanent upgrade bought");
            }
            PlayerCommand::CycleSpeed => {
                let levels = self.config.speed_levels.len().max(1);
                self.speed_index = (self.speed_index + 1) % levels;
                self.rearm();
            }
            PlayerCommand::SetAutoAdvance { enabled } => {
                self.auto_advance = enabled;
                if self.phase == GamePhase::LevelCleared {
                    if enabled {
                        if self.scheduler.schedule() == Schedule::Stopped {
                            self.scheduler.defer_advance(self.config.auto_advance_delay_ms);
                        }
                    } else {
                        self.scheduler.cancel();
                    }
                }
            }
            PlayerCommand::Resize { width, height } => {
                let candidate = SimConfig {
                    surface: Surface::new(width, height),
                    ..self.config.clone()
                };
                candidate.validate()?;
                self.config = candidate;
            }
            PlayerCommand::CollectPickup { id } => {
                self.require_active_game()
                    .map_err(|_| CommandError::InvalidPhase(self.phase))?;
                systems::pickups::collect(&mut self.roster, &mut self.ledger, id, &mut self.events);
            }
        }
        Ok(())
    }

    fn require_active_game(&self) -> Result<(), PurchaseError> {
        match self.phase {
            GamePhase::Running | GamePhase::LevelCleared => Ok(()),
            GamePhase::Idle | GamePhase::Ended => Err(PurchaseError::NoActiveGame),
        }
    }

    fn start_game(&mut self) {
        self.scheduler.cancel();
        self.progression = progression::start_game(
            &mut self.roster,
            &mut self.rng,
            &mut self.ledger,
            &mut self.stats,
            &mut self.base_health,
            &mut self.upgrades,
            &self.config.surface,
            &mut self.events,
        );
        self.pickup_timers = PickupTimers::new(&mut self.rng);
        self.time = SimTime::default();
        self.phase = GamePhase::Running;
        self.rearm();
    }

    fn advance_level(&mut self) {
        self.scheduler.cancel();
        let event = progression::advance_level(
            &mut self.progression,
            &mut self.roster,
            &mut self.rng,
            &mut self.ledger,
            &mut self.stats,
            &mut self.base_health,
            &self.upgrades,
            &self.config.surface,
            &mut self.events,
        );
        self.events.push(event);
        self.phase = GamePhase::Running;
        self.rearm();
    }

    /// Re-arm the repeating timer at the current period. Only a running
    /// game has a repeating timer.
    fn rearm(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let period_ms = self.tick_period();
        let generation = self.scheduler.reschedule(period_ms);
        debug!(period_ms, generation, "tick rescheduled");
        self.events.push(GameEvent::ScheduleChanged { period_ms });
    }

    fn clear_wave(&mut self) {
        self.scheduler.cancel();
        self.phase = GamePhase::LevelCleared;
        let level = self.progression.level;
        self.events.push(GameEvent::WaveCleared { level });
        info!(level, score = self.ledger.score(), "wave cleared");
        if self.auto_advance {
            self.scheduler.defer_advance(self.config.auto_advance_delay_ms);
        }
    }

    fn end_game(&mut self) {
        self.scheduler.cancel();
        self.phase = GamePhase::Ended;
        let score = self.ledger.score();
        let level = self.progression.level;
        self.events.push(GameEvent::GameOver { score, level });
        info!(score, level, "game over");
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        trace!(tick = self.time.tick, "tick");
        // 1. Wave spawning (at most one pollutant)
        systems::wave_spawner::run(
            &mut self.roster,
            &mut self.rng,
            &self.config.surface,
            &mut self.progression.wave,
            self.progression.level,
            &mut self.events,
        );
        // 2. Merge pass
        systems::merge::run(&mut self.roster, &mut self.events);
        // 3. Pollutant targeting, movement, impact
        systems::pollutant_ai::run(&mut self.roster, &mut self.ledger, &mut self.events);
        // 4. Tower firing
        systems::fire_control::run(&mut self.roster, &self.stats, &mut self.events);
        // 5. Bullet travel and impact
        systems::bullets::run(&mut self.roster, &mut self.ledger, &mut self.events);
        // 6. Drop dead communities
        systems::cleanup::run(&mut self.roster);

        match progression::evaluate(&self.roster, &self.progression.wave) {
            TickOutcome::Continue => systems::pickups::run(
                &mut self.roster,
                &mut self.rng,
                &self.config.surface,
                &mut self.pickup_timers,
                &mut self.events,
            ),
            TickOutcome::WaveCleared => self.clear_wave(),
            TickOutcome::GameOver => self.end_game(),
        }
    }
}
