//! Game state snapshot: the complete visible state handed to the host after each tick.

use serde::{Deserialize, Serialize};

use crate::components::{TowerStats, UpgradeState};
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EntityId, Position, SimTime};

/// Complete game state published after each tick or command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub coins: u64,
    pub wave: WaveView,
    pub tower_stats: TowerStats,
    pub upgrades: UpgradeState,
    pub speed_multiplier: f64,
    /// Current tick period, `None` while the timer is not repeating.
    pub tick_period_ms: Option<f64>,
    pub auto_advance: bool,
    pub communities: Vec<CommunityView>,
    pub towers: Vec<TowerView>,
    pub pollutants: Vec<PollutantView>,
    pub bullets: Vec<BulletView>,
    pub pickups: Vec<PickupView>,
    pub events: Vec<GameEvent>,
}

impl GameStateSnapshot {
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::Ended
    }
}

/// Wave progress for the current level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub spawned: u32,
    pub quota: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityView {
    pub id: EntityId,
    pub position: Position,
    pub health: i64,
    pub max_health: i64,
    pub health_fraction: f64,
    /// Present once the community stat buff is owned.
    pub tower_stats: Option<TowerStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: EntityId,
    pub position: Position,
    pub health: i64,
    pub max_health: i64,
    pub health_fraction: f64,
    pub cooldown: u32,
    pub range: f64,
    pub power: i64,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutantView {
    pub id: EntityId,
    pub position: Position,
    pub hp: i64,
    pub max_hp: i64,
    pub health_fraction: f64,
    pub speed: f64,
    pub power: i64,
    pub coin_value: u64,
    /// Level the pollutant spawned at.
    pub level: u32,
    /// Tower or community it is heading for, as of the last tick.
    pub target: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub id: EntityId,
    pub position: Position,
    pub target: EntityId,
    pub power: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub id: EntityId,
    pub kind: PickupKind,
    pub position: Position,
    pub ticks_remaining: u64,
}

/// Fraction of `max` left, clamped to `0.0..=1.0`.
pub fn health_fraction(health: i64, max: i64) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    (health as f64 / max as f64).clamp(0.0, 1.0)
}
