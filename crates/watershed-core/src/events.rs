//! Events emitted by the simulation for rendering and UI feedback.
//!
//! Spawn/despawn events stand in for the host's create/destroy-visual
//! callbacks; the host keys its visuals by `EntityId`.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EntitySpawned { kind: EntityKind, id: EntityId },
    EntityDespawned { kind: EntityKind, id: EntityId },
    /// `absorbed` was folded into `survivor`.
    PollutantsMerged { survivor: EntityId, absorbed: EntityId },
    ShotFired { tower: EntityId, target: EntityId },
    TowerDestroyed { id: EntityId },
    CommunityDestroyed { id: EntityId },
    /// Quota spawned and the field is empty.
    WaveCleared { level: u32 },
    /// `celebrate` is set on every tenth level.
    LevelAdvanced { level: u32, celebrate: bool },
    /// The tick timer was re-armed with a new period.
    ScheduleChanged { period_ms: f64 },
    PickupCollected { kind: PickupKind, score_delta: i64 },
    GameOver { score: u64, level: u32 },
}
