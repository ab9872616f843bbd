//! Entity collections owned by the simulation.
//!
//! Four fixed entity kinds (plus pickups), each in its own `Vec` kept in
//! spawn order. Scan order is vector order. Lookups by id tolerate missing
//! entities: a reference can outlive its target within a single tick.

use watershed_core::enums::{EntityKind, PickupKind};
use watershed_core::events::GameEvent;
use watershed_core::types::{EntityId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    pub id: EntityId,
    pub position: Position,
    pub health: i64,
    /// Cleared on destruction; dead communities are dropped at end of tick.
    pub alive: bool,
    /// Set by the community stat buff; the view then carries tower stats.
    pub has_tower_stats: bool,
}

/// Towers carry no stats of their own; range, power and speed come from
/// the shared `TowerStats`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tower {
    pub id: EntityId,
    pub position: Position,
    pub health: i64,
    /// Ticks left before the tower may fire again.
    pub cooldown: u32,
}

/// What a pollutant is heading for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Tower(EntityId),
    Community(EntityId),
}

impl Target {
    pub fn id(self) -> EntityId {
        match self {
            Target::Tower(id) | Target::Community(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pollutant {
    pub id: EntityId,
    pub position: Position,
    pub hp: i64,
    /// Display maximum: spawn hp, summed on merge.
    pub max_hp: i64,
    pub speed: f64,
    pub power: i64,
    /// Coins paid out when this pollutant dies.
    pub coin_value: u64,
    /// Level the pollutant spawned at.
    pub level: u32,
    /// Re-picked every tick; published in the view for drawing.
    pub target: Option<Target>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    pub position: Position,
    pub target: EntityId,
    /// Tower power at the moment of firing. Later upgrades do not change it.
    pub power: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub position: Position,
    pub ticks_remaining: u64,
}

/// All live entities.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    next_id: u32,
    pub communities: Vec<Community>,
    pub towers: Vec<Tower>,
    pub pollutants: Vec<Pollutant>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id. Ids are never reused, even across restarts,
    /// so a stale host visual can never alias a new entity.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Drop every entity, emitting a despawn event for each.
    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        let despawned = self
            .communities
            .drain(..)
            .map(|c| (EntityKind::Community, c.id))
            .chain(self.towers.drain(..).map(|t| (EntityKind::Tower, t.id)))
            .chain(self.pollutants.drain(..).map(|p| (EntityKind::Pollutant, p.id)))
            .chain(self.bullets.drain(..).map(|b| (EntityKind::Bullet, b.id)))
            .chain(self.pickups.drain(..).map(|p| (EntityKind::Pickup, p.id)));
        events.extend(despawned.map(|(kind, id)| GameEvent::EntityDespawned { kind, id }));
    }

    pub fn community(&self, id: EntityId) -> Option<&Community> {
        self.communities.iter().find(|c| c.id == id)
    }

    pub fn community_mut(&mut self, id: EntityId) -> Option<&mut Community> {
        self.communities.iter_mut().find(|c| c.id == id)
    }

    pub fn tower(&self, id: EntityId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn tower_mut(&mut self, id: EntityId) -> Option<&mut Tower> {
        self.towers.iter_mut().find(|t| t.id == id)
    }

    pub fn pollutant(&self, id: EntityId) -> Option<&Pollutant> {
        self.pollutants.iter().find(|p| p.id == id)
    }

    pub fn pollutant_mut(&mut self, id: EntityId) -> Option<&mut Pollutant> {
        self.pollutants.iter_mut().find(|p| p.id == id)
    }

    /// Remove a tower by id. `None` if it is already gone.
    pub fn remove_tower(&mut self, id: EntityId) -> Option<Tower> {
        let idx = self.towers.iter().position(|t| t.id == id)?;
        Some(self.towers.remove(idx))
    }

    /// Remove a pollutant by id. `None` if it is already gone.
    pub fn remove_pollutant(&mut self, id: EntityId) -> Option<Pollutant> {
        let idx = self.pollutants.iter().position(|p| p.id == id)?;
        Some(self.pollutants.remove(idx))
    }

    /// Remove a pickup by id. `None` if it expired or was collected.
    pub fn remove_pickup(&mut self, id: EntityId) -> Option<Pickup> {
        let idx = self.pickups.iter().position(|p| p.id == id)?;
        Some(self.pickups.remove(idx))
    }

    pub fn alive_communities(&self) -> impl Iterator<Item = &Community> {
        self.communities.iter().filter(|c| c.alive)
    }

    /// No pollutants and no bullets in flight.
    pub fn is_field_clear(&self) -> bool {
        self.pollutants.is_empty() && self.bullets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pollutant(roster: &mut Roster, x: f64) -> EntityId {
        let id = roster.allocate_id();
        roster.pollutants.push(Pollutant {
            id,
            position: Position::new(x, 0.0),
            hp: 60,
            max_hp: 60,
            speed: 1.2,
            power: 60,
            coin_value: 5,
            level: 1,
            target: None,
        });
        id
    }

    #[test]
    fn test_ids_are_unique() {
        let mut roster = Roster::new();
        let a = roster.allocate_id();
        let b = roster.allocate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_missing_is_tolerated() {
        let mut roster = Roster::new();
        let id = pollutant(&mut roster, 0.0);
        assert!(roster.remove_pollutant(id).is_some());
        assert!(roster.remove_pollutant(id).is_none());
        assert!(roster.remove_tower(EntityId(999)).is_none());
        assert!(roster.pollutant_mut(id).is_none());
    }

    #[test]
    fn test_clear_emits_despawns_and_keeps_id_counter() {
        let mut roster = Roster::new();
        let first = pollutant(&mut roster, 0.0);
        pollutant(&mut roster, 50.0);

        let mut events = Vec::new();
        roster.clear(&mut events);
        assert!(roster.pollutants.is_empty());
        assert_eq!(events.len(), 2);
        assert!(events.contains(&GameEvent::EntityDespawned {
            kind: EntityKind::Pollutant,
            id: first,
        }));

        let next = roster.allocate_id();
        assert!(next.0 > first.0 + 1);
    }
}
