//! Bullet flight and impact.

use watershed_core::constants::*;
use watershed_core::enums::EntityKind;
use watershed_core::events::GameEvent;
use watershed_core::types::EntityId;

use crate::economy::Ledger;
use crate::roster::Roster;
use crate::spatial::step_toward;

/// Advance every bullet. A bullet whose target is gone is discarded without
/// effect. On impact the bullet deals its frozen power and is spent whether
/// or not the target dies.
pub fn run(roster: &mut Roster, ledger: &mut Ledger, events: &mut Vec<GameEvent>) {
    let mut spent: Vec<EntityId> = Vec::new();

    for idx in 0..roster.bullets.len() {
        let bullet = &roster.bullets[idx];
        let (bullet_id, target_id, position, power) =
            (bullet.id, bullet.target, bullet.position, bullet.power);

        let Some(target_position) = roster.pollutant(target_id).map(|p| p.position) else {
            spent.push(bullet_id);
            continue;
        };

        if position.distance(target_position) < BULLET_HIT_RADIUS {
            let killed = roster.pollutant_mut(target_id).is_some_and(|p| {
                p.hp -= power;
                p.hp <= 0
            });
            if killed {
                if let Some(pollutant) = roster.remove_pollutant(target_id) {
                    ledger.award_kill(pollutant.coin_value);
                    events.push(GameEvent::EntityDespawned {
                        kind: EntityKind::Pollutant,
                        id: target_id,
                    });
                }
            }
            spent.push(bullet_id);
        } else {
            roster.bullets[idx].position = step_toward(position, target_position, BULLET_SPEED);
        }
    }

    if !spent.is_empty() {
        roster.bullets.retain(|b| !spent.contains(&b.id));
        events.extend(spent.into_iter().map(|id| GameEvent::EntityDespawned {
            kind: EntityKind::Bullet,
            id,
        }));
    }
}
