//! Pollutant AI: target selection, steering and impact.
//!
//! Each pollutant re-picks its target every tick: the nearest tower with
//! health left, otherwise the nearest alive community. Reaching the target
//! deals a fixed hit and consumes the pollutant.

use tracing::debug;

use watershed_core::constants::*;
use watershed_core::enums::EntityKind;
use watershed_core::events::GameEvent;
use watershed_core::types::{EntityId, Position};

use crate::economy::Ledger;
use crate::roster::{Roster, Target};
use crate::spatial::{nearest, step_toward};

pub fn run(roster: &mut Roster, ledger: &mut Ledger, events: &mut Vec<GameEvent>) {
    let mut consumed: Vec<EntityId> = Vec::new();

    // Pollutants are never added or removed inside this loop, so indices
    // stay valid; towers may be removed and communities flagged dead.
    for idx in 0..roster.pollutants.len() {
        let position = roster.pollutants[idx].position;
        let acquired = acquire_target(roster, position);
        roster.pollutants[idx].target = acquired.map(|(target, _, _)| target);

        let Some((target, target_position, dist)) = acquired else {
            continue;
        };

        if dist < POLLUTANT_IMPACT_RADIUS {
            strike(roster, ledger, target, events);
            consumed.push(roster.pollutants[idx].id);
        } else {
            let pollutant = &mut roster.pollutants[idx];
            pollutant.position = step_toward(position, target_position, pollutant.speed);
        }
    }

    // Consumed pollutants pay their coin value but no score.
    for id in consumed {
        if let Some(pollutant) = roster.remove_pollutant(id) {
            ledger.award_coins(pollutant.coin_value);
            events.push(GameEvent::EntityDespawned {
                kind: EntityKind::Pollutant,
                id,
            });
        }
    }
}

/// Nearest live tower, else nearest alive community, with its position and
/// distance. `None` when there is nothing left to attack.
pub fn acquire_target(roster: &Roster, from: Position) -> Option<(Target, Position, f64)> {
    let tower = nearest(
        from,
        roster
            .towers
            .iter()
            .filter(|t| t.health > 0)
            .map(|t| ((t.id, t.position), t.position)),
    );
    if let Some(((id, position), dist)) = tower {
        return Some((Target::Tower(id), position, dist));
    }

    nearest(
        from,
        roster
            .alive_communities()
            .map(|c| ((c.id, c.position), c.position)),
    )
    .map(|((id, position), dist)| (Target::Community(id), position, dist))
}

/// Apply one pollutant hit. Destroyed towers leave the roster immediately;
/// destroyed communities are flagged and dropped at end of tick.
fn strike(roster: &mut Roster, ledger: &mut Ledger, target: Target, events: &mut Vec<GameEvent>) {
    match target {
        Target::Tower(id) => {
            let Some(tower) = roster.tower_mut(id) else {
                return;
            };
            tower.health -= POLLUTANT_IMPACT_DAMAGE;
            if tower.health <= 0 {
                roster.remove_tower(id);
                ledger.penalize(TOWER_LOSS_PENALTY);
                debug!(tower = %id, "tower destroyed");
                events.push(GameEvent::TowerDestroyed { id });
                events.push(GameEvent::EntityDespawned {
                    kind: EntityKind::Tower,
                    id,
                });
            }
        }
        Target::Community(id) => {
            let Some(community) = roster.community_mut(id) else {
                return;
            };
            community.health -= POLLUTANT_IMPACT_DAMAGE;
            if community.health <= 0 && community.alive {
                community.alive = false;
                ledger.penalize(COMMUNITY_LOSS_PENALTY);
                debug!(community = %id, "community destroyed");
                events.push(GameEvent::CommunityDestroyed { id });
                events.push(GameEvent::EntityDespawned {
                    kind: EntityKind::Community,
                    id,
                });
            }
        }
    }
}
