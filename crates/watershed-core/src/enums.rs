//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Session state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game started yet.
    #[default]
    Idle,
    /// A level is in progress and the tick timer is armed.
    Running,
    /// The wave is spent and the field is clear; waiting for the next level.
    LevelCleared,
    /// Every community was destroyed.
    Ended,
}

/// The four simulated entity kinds, plus pickups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Community,
    Tower,
    Pollutant,
    Bullet,
    Pickup,
}

/// Repeatable shop upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Power,
    Range,
    Speed,
    CommunityHealth,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Power,
        UpgradeKind::Range,
        UpgradeKind::Speed,
        UpgradeKind::CommunityHealth,
    ];

    pub fn price(&self) -> u64 {
        UPGRADE_PRICE
    }
}

/// One-shot upgrades that persist for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermanentUpgrade {
    /// +5 tower power on every level advance.
    PowerPerLevel,
    /// Tower speed doubles on every level advance.
    SpeedPerLevel,
    /// Three extra towers on every level advance.
    ExtraTowers,
    /// Communities expose the tower stat block.
    CommunityBuff,
    /// Tower and community health scale to 100 x level.
    FullHp,
}

impl PermanentUpgrade {
    pub const ALL: [PermanentUpgrade; 5] = [
        PermanentUpgrade::PowerPerLevel,
        PermanentUpgrade::SpeedPerLevel,
        PermanentUpgrade::ExtraTowers,
        PermanentUpgrade::CommunityBuff,
        PermanentUpgrade::FullHp,
    ];

    pub fn price(&self) -> u64 {
        match self {
            PermanentUpgrade::FullHp => PERMANENT_FULL_HP_PRICE,
            _ => PERMANENT_UPGRADE_PRICE,
        }
    }
}

/// Collectible bonus items that appear while a game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Awards score when collected.
    Can,
    /// Costs score when collected.
    Mud,
}

impl PickupKind {
    /// Score change applied on collection.
    pub fn score_delta(&self) -> i64 {
        match self {
            PickupKind::Can => CAN_SCORE as i64,
            PickupKind::Mud => -(MUD_PENALTY as i64),
        }
    }

    pub fn lifetime_ticks(&self) -> u64 {
        match self {
            PickupKind::Can => CAN_LIFETIME_TICKS,
            PickupKind::Mud => MUD_LIFETIME_TICKS,
        }
    }

    /// Inclusive range of ticks until the next pickup of this kind spawns.
    pub fn spawn_interval_ticks(&self) -> (u64, u64) {
        match self {
            PickupKind::Can => (CAN_SPAWN_MIN_TICKS, CAN_SPAWN_MAX_TICKS),
            PickupKind::Mud => (MUD_SPAWN_MIN_TICKS, MUD_SPAWN_MAX_TICKS),
        }
    }
}
