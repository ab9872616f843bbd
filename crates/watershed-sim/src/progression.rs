//! Progression controller: session start, level transitions and the
//! end-of-tick termination checks.

use rand_chacha::ChaCha8Rng;
use tracing::info;

use watershed_core::components::{BaseHealth, TowerStats, UpgradeState};
use watershed_core::constants::*;
use watershed_core::events::GameEvent;
use watershed_core::types::Surface;

use crate::economy::{self, Ledger};
use crate::roster::Roster;
use crate::systems::wave_spawner::WaveState;
use crate::world_setup::{self, Placement};

/// Current level and its wave counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub wave: WaveState,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            wave: WaveState::default(),
        }
    }
}

/// What the end-of-tick checks decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Quota spent and nothing left in flight.
    WaveCleared,
    /// No communities remain.
    GameOver,
}

/// Evaluate termination after the resolver has run and dead communities
/// have been dropped. Game over takes precedence.
pub fn evaluate(roster: &Roster, wave: &WaveState) -> TickOutcome {
    if roster.communities.is_empty() {
        TickOutcome::GameOver
    } else if wave.is_exhausted() && roster.is_field_clear() {
        TickOutcome::WaveCleared
    } else {
        TickOutcome::Continue
    }
}

/// Reset every piece of session state and lay out the starting roster.
#[allow(clippy::too_many_arguments)]
pub fn start_game(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    ledger: &mut Ledger,
    stats: &mut TowerStats,
    base_health: &mut BaseHealth,
    upgrades: &mut UpgradeState,
    surface: &Surface,
    events: &mut Vec<GameEvent>,
) -> Progression {
    *ledger = Ledger::default();
    *stats = TowerStats::default();
    *base_health = BaseHealth::default();
    *upgrades = UpgradeState::default();
    roster.clear(events);

    let placement = Placement::new(*surface, *base_health, upgrades);
    world_setup::setup_starting_roster(roster, rng, &placement, events);

    info!(
        communities = roster.communities.len(),
        towers = roster.towers.len(),
        "game started"
    );
    Progression::default()
}

/// Move to the next level. Applies the level-clear bonus, every active
/// permanent upgrade's per-level effect, and the scheduled reinforcements.
/// Returns the `LevelAdvanced` event payload.
#[allow(clippy::too_many_arguments)]
pub fn advance_level(
    progression: &mut Progression,
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    ledger: &mut Ledger,
    stats: &mut TowerStats,
    base_health: &mut BaseHealth,
    upgrades: &UpgradeState,
    surface: &Surface,
    events: &mut Vec<GameEvent>,
) -> GameEvent {
    progression.level += 1;
    let level = progression.level;
    progression.wave = WaveState::for_level(level);
    ledger.award_score(LEVEL_CLEAR_BONUS);

    if upgrades.power_per_level {
        stats.power += PERMANENT_POWER_PER_LEVEL;
    }
    if upgrades.speed_per_level {
        stats.speed *= PERMANENT_SPEED_FACTOR;
    }

    let placement = Placement::new(*surface, *base_health, upgrades);
    if upgrades.extra_towers {
        for _ in 0..PERMANENT_EXTRA_TOWERS {
            world_setup::place_tower_near_random_community(roster, rng, &placement, events);
        }
    }
    if upgrades.full_hp {
        economy::scale_health_to_level(base_health, roster, level);
    }

    // Full-HP scaling may have raised base health; reinforcements use it.
    let placement = Placement::new(*surface, *base_health, upgrades);
    world_setup::place_tower_near_random_community(roster, rng, &placement, events);
    if level % COMMUNITY_LEVEL_INTERVAL == 0 {
        let position = world_setup::random_position(rng, surface, COMMUNITY_SIZE);
        world_setup::place_community(roster, &placement, position, events);
    }
    if upgrades.community_buff {
        economy::grant_community_stats(roster);
    }

    let celebrate = level % CELEBRATION_LEVEL_INTERVAL == 0;
    info!(level, quota = progression.wave.quota, celebrate, "level advanced");
    GameEvent::LevelAdvanced { level, celebrate }
}
