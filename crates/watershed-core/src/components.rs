//! Shared stat records read by many entities at once.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::PermanentUpgrade;

/// The single tower stat block. Towers never hold a copy: every tower reads
/// this record, so an upgrade applies to all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub range: f64,
    pub power: i64,
    /// Shots-per-tick multiplier; also scales the tick rate.
    pub speed: f64,
}

impl Default for TowerStats {
    fn default() -> Self {
        Self {
            range: INITIAL_TOWER_RANGE,
            power: INITIAL_TOWER_POWER,
            speed: INITIAL_TOWER_SPEED,
        }
    }
}

impl TowerStats {
    /// Ticks a tower waits after firing: `max(1, floor(30 / speed))`.
    pub fn fire_cooldown(&self) -> u32 {
        let ticks = (FIRE_COOLDOWN_BASE / self.speed).floor();
        if ticks.is_finite() && ticks >= 1.0 {
            ticks as u32
        } else {
            1
        }
    }
}

/// Health newly placed entities start with; also the display maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHealth {
    pub tower: i64,
    pub community: i64,
}

impl Default for BaseHealth {
    fn default() -> Self {
        Self {
            tower: INITIAL_TOWER_HEALTH,
            community: INITIAL_COMMUNITY_HEALTH,
        }
    }
}

/// The five permanent upgrade switches. Each only ever goes false -> true
/// within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub power_per_level: bool,
    pub speed_per_level: bool,
    pub extra_towers: bool,
    pub community_buff: bool,
    pub full_hp: bool,
}

impl UpgradeState {
    pub fn is_active(&self, upgrade: PermanentUpgrade) -> bool {
        match upgrade {
            PermanentUpgrade::PowerPerLevel => self.power_per_level,
            PermanentUpgrade::SpeedPerLevel => self.speed_per_level,
            PermanentUpgrade::ExtraTowers => self.extra_towers,
            PermanentUpgrade::CommunityBuff => self.community_buff,
            PermanentUpgrade::FullHp => self.full_hp,
        }
    }

    /// Set the flag. Returns false if it was already set.
    pub fn activate(&mut self, upgrade: PermanentUpgrade) -> bool {
        let flag = match upgrade {
            PermanentUpgrade::PowerPerLevel => &mut self.power_per_level,
            PermanentUpgrade::SpeedPerLevel => &mut self.speed_per_level,
            PermanentUpgrade::ExtraTowers => &mut self.extra_towers,
            PermanentUpgrade::CommunityBuff => &mut self.community_buff,
            PermanentUpgrade::FullHp => &mut self.full_hp,
        };
        !std::mem::replace(flag, true)
    }
}
