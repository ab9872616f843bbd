//! Snapshot system: reads the roster and session state and builds a complete
//! GameStateSnapshot.
//!
//! This system is read-only; it never modifies the roster.

use watershed_core::components::{BaseHealth, TowerStats, UpgradeState};
use watershed_core::enums::GamePhase;
use watershed_core::events::GameEvent;
use watershed_core::state::*;
use watershed_core::types::SimTime;

use crate::economy::Ledger;
use crate::progression::Progression;
use crate::roster::Roster;

/// Session scalars the snapshot reports alongside the roster.
pub struct SessionView<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub progression: &'a Progression,
    pub ledger: &'a Ledger,
    pub stats: &'a TowerStats,
    pub base_health: &'a BaseHealth,
    pub upgrades: &'a UpgradeState,
    pub speed_multiplier: f64,
    pub tick_period_ms: Option<f64>,
    pub auto_advance: bool,
}

/// Build a complete GameStateSnapshot from the current roster and session.
pub fn build_snapshot(
    roster: &Roster,
    session: &SessionView<'_>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: session.time,
        phase: session.phase,
        level: session.progression.level,
        score: session.ledger.score(),
        coins: session.ledger.coins(),
        wave: WaveView {
            spawned: session.progression.wave.spawned,
            quota: session.progression.wave.quota,
        },
        tower_stats: *session.stats,
        upgrades: *session.upgrades,
        speed_multiplier: session.speed_multiplier,
        tick_period_ms: session.tick_period_ms,
        auto_advance: session.auto_advance,
        communities: build_communities(roster, session),
        towers: build_towers(roster, session),
        pollutants: build_pollutants(roster),
        bullets: build_bullets(roster),
        pickups: build_pickups(roster),
        events,
    }
}

fn build_communities(roster: &Roster, session: &SessionView<'_>) -> Vec<CommunityView> {
    let max_health = session.base_health.community;
    roster
        .alive_communities()
        .map(|c| CommunityView {
            id: c.id,
            position: c.position,
            health: c.health,
            max_health,
            health_fraction: health_fraction(c.health, max_health),
            tower_stats: c.has_tower_stats.then_some(*session.stats),
        })
        .collect()
}

/// Every tower shows the shared stat block.
fn build_towers(roster: &Roster, session: &SessionView<'_>) -> Vec<TowerView> {
    let max_health = session.base_health.tower;
    roster
        .towers
        .iter()
        .map(|t| TowerView {
            id: t.id,
            position: t.position,
            health: t.health,
            max_health,
            health_fraction: health_fraction(t.health, max_health),
            cooldown: t.cooldown,
            range: session.stats.range,
            power: session.stats.power,
            speed: session.stats.speed,
        })
        .collect()
}

fn build_pollutants(roster: &Roster) -> Vec<PollutantView> {
    roster
        .pollutants
        .iter()
        .map(|p| PollutantView {
            id: p.id,
            position: p.position,
            hp: p.hp,
            max_hp: p.max_hp,
            health_fraction: health_fraction(p.hp, p.max_hp),
            speed: p.speed,
            power: p.power,
            coin_value: p.coin_value,
            level: p.level,
            target: p.target.map(|t| t.id()),
        })
        .collect()
}

fn build_bullets(roster: &Roster) -> Vec<BulletView> {
    roster
        .bullets
        .iter()
        .map(|b| BulletView {
            id: b.id,
            position: b.position,
            target: b.target,
            power: b.power,
        })
        .collect()
}

fn build_pickups(roster: &Roster) -> Vec<PickupView> {
    roster
        .pickups
        .iter()
        .map(|p| PickupView {
            id: p.id,
            kind: p.kind,
            position: p.position,
            ticks_remaining: p.ticks_remaining,
        })
        .collect()
}
