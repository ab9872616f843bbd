//! Entity factories.
//!
//! Every factory validates its spawn position. A rejected placement is not
//! an error: the entity is simply not created and `None` is returned.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use watershed_core::components::{BaseHealth, UpgradeState};
use watershed_core::constants::*;
use watershed_core::enums::EntityKind;
use watershed_core::events::GameEvent;
use watershed_core::types::{EntityId, Position, Surface};

use crate::roster::{Community, Pollutant, Roster, Tower};
use crate::spatial::is_overlapping;
use crate::systems::wave_spawner::WaveState;

/// Everything a factory needs to know about the current session to
/// construct an entity.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub surface: Surface,
    pub base_health: BaseHealth,
    pub community_buff: bool,
}

impl Placement {
    pub fn new(surface: Surface, base_health: BaseHealth, upgrades: &UpgradeState) -> Self {
        Self {
            surface,
            base_health,
            community_buff: upgrades.community_buff,
        }
    }
}

/// Set up the starting roster: three communities, each with a tower nearby.
pub fn setup_starting_roster(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    placement: &Placement,
    events: &mut Vec<GameEvent>,
) {
    for _ in 0..STARTING_COMMUNITIES {
        let position = random_position(rng, &placement.surface, COMMUNITY_SIZE);
        place_community(roster, placement, position, events);
    }

    let anchors: Vec<Position> = roster.communities.iter().map(|c| c.position).collect();
    for anchor in anchors {
        place_tower_near(roster, rng, placement, anchor, events);
    }
}

/// Uniform random top-left corner for an entity of `size` on the surface.
pub fn random_position(rng: &mut ChaCha8Rng, surface: &Surface, size: f64) -> Position {
    let max = surface.max_origin(size);
    Position::new(rng.gen::<f64>() * max.x, rng.gen::<f64>() * max.y)
}

/// Place a community, clamped onto the surface. Rejected if it would crowd
/// an existing tower or community.
pub fn place_community(
    roster: &mut Roster,
    placement: &Placement,
    position: Position,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    let position = placement.surface.clamp(position, COMMUNITY_SIZE);
    if crowds_existing(roster, position, COMMUNITY_SIZE) {
        debug!(x = position.x, y = position.y, "community placement rejected");
        return None;
    }

    let id = roster.allocate_id();
    roster.communities.push(Community {
        id,
        position,
        health: placement.base_health.community,
        alive: true,
        has_tower_stats: placement.community_buff,
    });
    events.push(GameEvent::EntitySpawned {
        kind: EntityKind::Community,
        id,
    });
    Some(id)
}

/// Place a tower, clamped onto the surface. Rejected if it would crowd an
/// existing tower or community.
pub fn place_tower(
    roster: &mut Roster,
    placement: &Placement,
    position: Position,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    let position = placement.surface.clamp(position, TOWER_SIZE);
    if crowds_existing(roster, position, TOWER_SIZE) {
        debug!(x = position.x, y = position.y, "tower placement rejected");
        return None;
    }

    let id = roster.allocate_id();
    roster.towers.push(Tower {
        id,
        position,
        health: placement.base_health.tower,
        cooldown: 0,
    });
    events.push(GameEvent::EntitySpawned {
        kind: EntityKind::Tower,
        id,
    });
    Some(id)
}

/// Try up to 20 random points on the 50..90 annulus around a community's
/// centre and place a tower at the first free one.
pub fn place_tower_near(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    placement: &Placement,
    community_position: Position,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    let centre = community_position + Position::splat(COMMUNITY_SIZE / 2.0);

    for _ in 0..TOWER_RING_MAX_TRIES {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let dist = rng.gen_range(TOWER_RING_MIN_DIST..TOWER_RING_MAX_DIST);
        let candidate = centre + Position::from_angle(angle) * dist;
        let candidate = placement.surface.clamp(candidate, TOWER_SIZE);
        if !crowds_existing(roster, candidate, TOWER_SIZE) {
            return place_tower(roster, placement, candidate, events);
        }
    }

    debug!(
        x = community_position.x,
        y = community_position.y,
        "no free spot for a tower near community"
    );
    None
}

/// Place a tower near a random community, or anywhere if none are left.
pub fn place_tower_near_random_community(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    placement: &Placement,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    if roster.communities.is_empty() {
        let position = random_position(rng, &placement.surface, TOWER_SIZE);
        return place_tower(roster, placement, position, events);
    }
    let idx = rng.gen_range(0..roster.communities.len());
    let anchor = roster.communities[idx].position;
    place_tower_near(roster, rng, placement, anchor, events)
}

/// Spawn one pollutant on a random edge of the surface, scaled to `level`.
/// No-op once the wave quota is reached or when no communities remain.
pub fn spawn_pollutant(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    surface: &Surface,
    wave: &mut WaveState,
    level: u32,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    if wave.is_exhausted() || roster.communities.is_empty() {
        return None;
    }

    let max = surface.max_origin(POLLUTANT_SIZE);
    let position = match rng.gen_range(0..4) {
        0 => Position::new(rng.gen::<f64>() * max.x, 0.0),
        1 => Position::new(max.x, rng.gen::<f64>() * max.y),
        2 => Position::new(rng.gen::<f64>() * max.x, max.y),
        _ => Position::new(0.0, rng.gen::<f64>() * max.y),
    };

    let scale = i64::from(level);
    let hp = POLLUTANT_BASE_HP + POLLUTANT_HP_PER_LEVEL * scale;
    let id = roster.allocate_id();
    roster.pollutants.push(Pollutant {
        id,
        position,
        hp,
        max_hp: hp,
        speed: POLLUTANT_BASE_SPEED + POLLUTANT_SPEED_PER_LEVEL * f64::from(level),
        power: POLLUTANT_BASE_POWER + POLLUTANT_POWER_PER_LEVEL * scale,
        coin_value: POLLUTANT_BASE_COIN_VALUE,
        level,
        target: None,
    });
    wave.spawned += 1;
    events.push(GameEvent::EntitySpawned {
        kind: EntityKind::Pollutant,
        id,
    });
    Some(id)
}

fn crowds_existing(roster: &Roster, position: Position, size: f64) -> bool {
    is_overlapping(
        position,
        size,
        roster.towers.iter().map(|t| t.position),
        TOWER_SIZE,
    ) || is_overlapping(
        position,
        size,
        roster.communities.iter().map(|c| c.position),
        COMMUNITY_SIZE,
    )
}
