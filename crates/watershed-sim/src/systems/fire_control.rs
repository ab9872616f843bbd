//! Fire control: towers shoot at the nearest pollutant in range.

use watershed_core::components::TowerStats;
use watershed_core::constants::BULLET_MUZZLE_OFFSET;
use watershed_core::enums::EntityKind;
use watershed_core::events::GameEvent;
use watershed_core::types::{EntityId, Position};

use crate::roster::{Bullet, Roster};
use crate::spatial::nearest;

/// Run fire control for one tick. Towers on cooldown count down and do
/// nothing else. Bullets copy the current power; they do not track later
/// upgrades.
pub fn run(roster: &mut Roster, stats: &TowerStats, events: &mut Vec<GameEvent>) {
    let mut shots: Vec<(EntityId, Position, EntityId)> = Vec::new();

    for tower in roster.towers.iter_mut() {
        if tower.health <= 0 {
            continue;
        }
        if tower.cooldown > 0 {
            tower.cooldown -= 1;
            continue;
        }

        let in_range = roster
            .pollutants
            .iter()
            .map(|p| (p.id, p.position))
            .filter(|(_, position)| tower.position.distance(*position) < stats.range);
        if let Some((target, _)) = nearest(tower.position, in_range) {
            shots.push((tower.id, tower.position, target));
            tower.cooldown = stats.fire_cooldown();
        }
    }

    for (tower, origin, target) in shots {
        let id = roster.allocate_id();
        roster.bullets.push(Bullet {
            id,
            position: origin + Position::splat(BULLET_MUZZLE_OFFSET),
            target,
            power: stats.power,
        });
        events.push(GameEvent::EntitySpawned {
            kind: EntityKind::Bullet,
            id,
        });
        events.push(GameEvent::ShotFired { tower, target });
    }
}
