//! Merge system: pollutants whose positions come within 30 units fuse.
//!
//! Pairs are scanned in ascending index order. The lower-indexed pollutant
//! absorbs the higher-indexed one, which is removed; the scan then re-checks
//! the same slot so chains collapse within a single pass.

use tracing::debug;

use watershed_core::constants::*;
use watershed_core::enums::EntityKind;
use watershed_core::events::GameEvent;

use crate::roster::{Pollutant, Roster};

pub fn run(roster: &mut Roster, events: &mut Vec<GameEvent>) {
    let pollutants = &mut roster.pollutants;
    let mut i = 0;
    while i < pollutants.len() {
        let mut j = i + 1;
        while j < pollutants.len() {
            if pollutants[i].position.distance(pollutants[j].position) < MERGE_DISTANCE {
                let absorbed = pollutants.remove(j);
                let survivor = &mut pollutants[i];
                absorb(survivor, &absorbed);
                debug!(
                    survivor = %survivor.id,
                    absorbed = %absorbed.id,
                    hp = survivor.hp,
                    power = survivor.power,
                    "pollutants merged"
                );
                events.push(GameEvent::PollutantsMerged {
                    survivor: survivor.id,
                    absorbed: absorbed.id,
                });
                events.push(GameEvent::EntityDespawned {
                    kind: EntityKind::Pollutant,
                    id: absorbed.id,
                });
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Fold `absorbed` into `survivor`. hp and power add exactly; speed halves
/// (never below 0.5); coin values add plus a bonus.
pub fn absorb(survivor: &mut Pollutant, absorbed: &Pollutant) {
    survivor.hp += absorbed.hp;
    survivor.max_hp += absorbed.max_hp;
    survivor.power += absorbed.power;
    survivor.speed = (survivor.speed / 2.0).max(MERGE_MIN_SPEED);
    survivor.coin_value += absorbed.coin_value + MERGE_COIN_BONUS;
}
