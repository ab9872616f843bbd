//! Pickups: cans and mud puddles that appear on the field while a level
//! runs. Timers count in ticks.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use watershed_core::constants::PICKUP_SIZE;
use watershed_core::enums::{EntityKind, PickupKind};
use watershed_core::events::GameEvent;
use watershed_core::types::{EntityId, Surface};

use crate::economy::Ledger;
use crate::roster::{Pickup, Roster};
use crate::world_setup::random_position;

/// Ticks until the next can and the next mud puddle appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupTimers {
    pub can_in: u64,
    pub mud_in: u64,
}

impl PickupTimers {
    pub fn new(rng: &mut ChaCha8Rng) -> Self {
        Self {
            can_in: next_interval(rng, PickupKind::Can),
            mud_in: next_interval(rng, PickupKind::Mud),
        }
    }
}

fn next_interval(rng: &mut ChaCha8Rng, kind: PickupKind) -> u64 {
    let (min, max) = kind.spawn_interval_ticks();
    rng.gen_range(min..=max)
}

/// Age existing pickups, expire the stale ones and spawn any that are due.
pub fn run(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    surface: &Surface,
    timers: &mut PickupTimers,
    events: &mut Vec<GameEvent>,
) {
    for pickup in roster.pickups.iter_mut() {
        pickup.ticks_remaining = pickup.ticks_remaining.saturating_sub(1);
    }
    roster.pickups.retain(|p| {
        let alive = p.ticks_remaining > 0;
        if !alive {
            events.push(GameEvent::EntityDespawned {
                kind: EntityKind::Pickup,
                id: p.id,
            });
        }
        alive
    });

    for (kind, countdown) in [
        (PickupKind::Can, &mut timers.can_in),
        (PickupKind::Mud, &mut timers.mud_in),
    ] {
        *countdown = countdown.saturating_sub(1);
        if *countdown == 0 {
            spawn(roster, rng, surface, kind, events);
            *countdown = next_interval(rng, kind);
        }
    }
}

fn spawn(
    roster: &mut Roster,
    rng: &mut ChaCha8Rng,
    surface: &Surface,
    kind: PickupKind,
    events: &mut Vec<GameEvent>,
) {
    let id = roster.allocate_id();
    let position = random_position(rng, surface, PICKUP_SIZE);
    roster.pickups.push(Pickup {
        id,
        kind,
        position,
        ticks_remaining: kind.lifetime_ticks(),
    });
    events.push(GameEvent::EntitySpawned {
        kind: EntityKind::Pickup,
        id,
    });
}

/// Collect a pickup. A missing or expired id is ignored.
pub fn collect(
    roster: &mut Roster,
    ledger: &mut Ledger,
    id: EntityId,
    events: &mut Vec<GameEvent>,
) -> Option<PickupKind> {
    let pickup = roster.remove_pickup(id)?;
    let score_delta = pickup.kind.score_delta();
    ledger.apply_score_delta(score_delta);
    events.push(GameEvent::PickupCollected {
        kind: pickup.kind,
        score_delta,
    });
    events.push(GameEvent::EntityDespawned {
        kind: EntityKind::Pickup,
        id,
    });
    Some(pickup.kind)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_pickups_spawn_expire_and_respawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roster = Roster::new();
        let mut events = Vec::new();
        let mut timers = PickupTimers { can_in: 1, mud_in: 1000 };
        let surface = Surface::default();

        run(&mut roster, &mut rng, &surface, &mut timers, &mut events);
        assert_eq!(roster.pickups.len(), 1);
        assert_eq!(roster.pickups[0].kind, PickupKind::Can);
        assert!((27..=50).contains(&timers.can_in));

        // Keep the next can from spawning while the first one ages out.
        timers.can_in = 1000;
        for _ in 0..PickupKind::Can.lifetime_ticks() {
            run(&mut roster, &mut rng, &surface, &mut timers, &mut events);
        }
        assert!(roster.pickups.is_empty());
    }

    #[test]
    fn test_collecting_mud_floors_score() {
        let mut roster = Roster::new();
        let mut ledger = Ledger::default();
        let mut events = Vec::new();
        let id = roster.allocate_id();
        roster.pickups.push(Pickup {
            id,
            kind: PickupKind::Mud,
            position: Default::default(),
            ticks_remaining: 5,
        });
        ledger.award_score(4);

        assert_eq!(collect(&mut roster, &mut ledger, id, &mut events), Some(PickupKind::Mud));
        assert_eq!(ledger.score(), 0);
        assert_eq!(collect(&mut roster, &mut ledger, id, &mut events), None);
    }

    #[test]
    fn test_collecting_can_awards_score() {
        let mut roster = Roster::new();
        let mut ledger = Ledger::default();
        let mut events = Vec::new();
        let id = roster.allocate_id();
        roster.pickups.push(Pickup {
            id,
            kind: PickupKind::Can,
            position: Default::default(),
            ticks_remaining: 5,
        });
        collect(&mut roster, &mut ledger, id, &mut events);
        assert_eq!(ledger.score(), 15);
        assert_eq!(ledger.coins(), 0);
    }
}
