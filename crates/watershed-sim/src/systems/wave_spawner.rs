//! Wave spawning system: releases one pollutant per tick until the level's
//! quota is spent.

use rand_chacha::ChaCha8Rng;

use watershed_core::constants::{FIRST_WAVE_QUOTA, WAVE_QUOTA_PER_LEVEL};
use watershed_core::events::GameEvent;
use watershed_core::types::Surface;

use crate::roster::Roster;
use crate::world_setup;

/// Spawn counters for the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveState {
    pub spawned: u32,
    pub quota: u32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new(FIRST_WAVE_QUOTA)
    }
}

impl WaveState {
    pub fn new(quota: u32) -> Self {
        Self { spawned: 0, quota }
    }

    /// Counters for a level reached by advancing: quota = level x 5.
    pub fn for_level(level: u32) -> Self {
        Self::new(level * WAVE_QUOTA_PER_LEVEL)
    }

    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.quota
    }
}

pub fn run(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    surface: &Surface,
    wave: &mut WaveState,
    level: u32,
    events: &mut Vec<GameEvent>,
) {
    if !wave.is_exhausted() {
        world_setup::spawn_pollutant(roster, rng, surface, wave, level, events);
    }
}
