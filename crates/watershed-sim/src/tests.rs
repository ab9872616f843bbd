//! Tests for the simulation engine, combat resolver, progression and
//! scheduler wiring.

use watershed_core::commands::PlayerCommand;
use watershed_core::enums::*;
use watershed_core::events::GameEvent;
use watershed_core::types::{EntityId, Position};

use crate::economy::{Ledger, PurchaseError};
use crate::engine::{CommandError, SimConfig, SimulationEngine};
use crate::roster::{Bullet, Community, Pollutant, Roster, Target, Tower};
use crate::scheduler::Schedule;
use crate::systems::{bullets, merge, pollutant_ai};

fn running_engine(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.execute(PlayerCommand::StartGame).unwrap();
    engine.snapshot();
    engine
}

/// Empty the field and leave one far-away community so the game keeps
/// running. The wave is marked spent so nothing new spawns.
fn staged_engine() -> SimulationEngine {
    let mut engine = running_engine(SimConfig::default());
    let roster = engine.roster_mut();
    roster.communities.clear();
    roster.towers.clear();
    roster.pollutants.clear();
    roster.bullets.clear();
    roster.pickups.clear();
    let id = roster.allocate_id();
    roster.communities.push(community(id, Position::new(700.0, 500.0)));
    let wave = &mut engine.progression_mut().wave;
    wave.spawned = wave.quota;
    engine
}

fn community(id: EntityId, position: Position) -> Community {
    Community {
        id,
        position,
        health: 100,
        alive: true,
        has_tower_stats: false,
    }
}

fn tower(id: EntityId, position: Position) -> Tower {
    Tower {
        id,
        position,
        health: 100,
        cooldown: 0,
    }
}

fn pollutant(id: EntityId, position: Position, hp: i64, speed: f64) -> Pollutant {
    Pollutant {
        id,
        position,
        hp,
        max_hp: hp,
        speed,
        power: 60,
        coin_value: 5,
        level: 1,
        target: None,
    }
}

fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ---- Combat resolver ----

#[test]
fn test_merge_two_level_one_pollutants() {
    let mut roster = Roster::new();
    let a = roster.allocate_id();
    let b = roster.allocate_id();
    roster.pollutants.push(pollutant(a, Position::new(100.0, 100.0), 60, 1.2));
    roster.pollutants.push(pollutant(b, Position::new(110.0, 100.0), 60, 1.2));
    let mut events = Vec::new();

    merge::run(&mut roster, &mut events);

    assert_eq!(roster.pollutants.len(), 1);
    let merged = &roster.pollutants[0];
    assert_eq!(merged.id, a);
    assert_eq!(merged.hp, 120);
    assert_eq!(merged.power, 120);
    assert_eq!(merged.speed, 0.6);
    assert_eq!(merged.coin_value, 15);
    assert_eq!(
        count_events(&events, |e| matches!(e, GameEvent::PollutantsMerged { .. })),
        1
    );
}

#[test]
fn test_second_bullet_is_orphaned_after_kill() {
    let mut roster = Roster::new();
    let target = roster.allocate_id();
    roster
        .pollutants
        .push(pollutant(target, Position::new(200.0, 200.0), 60, 1.2));
    for _ in 0..2 {
        let id = roster.allocate_id();
        roster.bullets.push(Bullet {
            id,
            position: Position::new(195.0, 200.0),
            target,
            power: 100,
        });
    }
    let mut ledger = Ledger::default();
    let mut events = Vec::new();

    bullets::run(&mut roster, &mut ledger, &mut events);

    assert!(roster.pollutants.is_empty());
    assert!(roster.bullets.is_empty());
    assert_eq!(ledger.score(), 10);
    assert_eq!(ledger.coins(), 5);
}

#[test]
fn test_pollutant_prefers_live_tower_over_community() {
    let mut roster = Roster::new();
    let near_community = roster.allocate_id();
    let dead_tower = roster.allocate_id();
    let far_tower = roster.allocate_id();
    roster
        .communities
        .push(community(near_community, Position::new(10.0, 0.0)));
    let mut wrecked = tower(dead_tower, Position::new(5.0, 0.0));
    wrecked.health = 0;
    roster.towers.push(wrecked);
    roster.towers.push(tower(far_tower, Position::new(300.0, 0.0)));

    let (target, _, dist) = pollutant_ai::acquire_target(&roster, Position::ZERO).unwrap();
    assert_eq!(target, Target::Tower(far_tower));
    assert_eq!(dist, 300.0);

    roster.towers.clear();
    let (target, _, _) = pollutant_ai::acquire_target(&roster, Position::ZERO).unwrap();
    assert_eq!(target, Target::Community(near_community));

    roster.communities[0].alive = false;
    assert!(pollutant_ai::acquire_target(&roster, Position::ZERO).is_none());
}

#[test]
fn test_impact_pays_coins_but_no_score() {
    let mut roster = Roster::new();
    let c = roster.allocate_id();
    let p = roster.allocate_id();
    roster.communities.push(community(c, Position::new(50.0, 50.0)));
    roster.pollutants.push(pollutant(p, Position::new(60.0, 50.0), 60, 1.2));
    let mut ledger = Ledger::default();
    ledger.award_score(2000);
    let mut events = Vec::new();

    pollutant_ai::run(&mut roster, &mut ledger, &mut events);

    assert!(roster.pollutants.is_empty());
    assert_eq!(roster.communities[0].health, 50);
    assert_eq!(ledger.coins(), 5);
    assert_eq!(ledger.score(), 2000);
}

#[test]
fn test_bullet_damage_frozen_at_fire_time() {
    let mut engine = staged_engine();
    let roster = engine.roster_mut();
    let t = roster.allocate_id();
    let p = roster.allocate_id();
    roster.towers.push(tower(t, Position::new(100.0, 100.0)));
    // Speed 0: the pollutant sits 30 units from the tower, in range.
    roster
        .pollutants
        .push(pollutant(p, Position::new(130.0, 100.0), 1000, 0.0));

    engine.tick();
    assert_eq!(engine.roster().bullets.len(), 1);
    assert_eq!(engine.roster().bullets[0].power, 100);

    engine.ledger_mut().award_coins(50);
    for _ in 0..5 {
        engine
            .execute(PlayerCommand::BuyUpgrade { upgrade: UpgradeKind::Power })
            .unwrap();
    }
    assert_eq!(engine.tower_stats().power, 150);

    for _ in 0..5 {
        engine.tick();
    }
    assert!(engine.roster().bullets.is_empty());
    assert_eq!(engine.roster().pollutants[0].hp, 900);
}

#[test]
fn test_snapshot_publishes_pollutant_target() {
    let mut engine = staged_engine();
    let community_id = engine.roster().communities[0].id;
    let roster = engine.roster_mut();
    let tower_id = roster.allocate_id();
    roster.towers.push(tower(tower_id, Position::new(100.0, 100.0)));
    let chaser = roster.allocate_id();
    roster
        .pollutants
        .push(pollutant(chaser, Position::new(400.0, 100.0), 10_000, 1.2));

    let snap = engine.tick();
    let view = snap.pollutants.iter().find(|p| p.id == chaser).unwrap();
    assert_eq!(view.target, Some(tower_id));

    engine.roster_mut().towers.clear();
    let snap = engine.tick();
    let view = snap.pollutants.iter().find(|p| p.id == chaser).unwrap();
    assert_eq!(view.target, Some(community_id));
}

// ---- Progression ----

#[test]
fn test_wave_clear_fires_exactly_once() {
    let mut engine = staged_engine();
    let mut cleared = 0;
    for _ in 0..10 {
        let snap = engine.tick();
        cleared += count_events(&snap.events, |e| matches!(e, GameEvent::WaveCleared { .. }));
    }
    assert_eq!(cleared, 1);
    assert_eq!(engine.phase(), GamePhase::LevelCleared);
    assert_eq!(engine.time().tick, 1);

    let generation = engine.scheduler().generation();
    assert_eq!(
        engine.scheduler().schedule(),
        Schedule::AdvancePending { delay_ms: 800 }
    );
    assert!(engine.fire_pending_advance(generation));
    assert!(!engine.fire_pending_advance(generation));

    assert_eq!(engine.phase(), GamePhase::Running);
    assert_eq!(engine.level(), 2);
    assert_eq!(engine.ledger().score(), 1000);
    let snap = engine.snapshot();
    assert_eq!(snap.wave.quota, 10);
    assert_eq!(snap.wave.spawned, 0);
    assert!(snap
        .events
        .contains(&GameEvent::LevelAdvanced { level: 2, celebrate: false }));
}

#[test]
fn test_disabling_auto_advance_during_delay_suppresses_it() {
    let mut engine = staged_engine();
    engine.tick();
    let generation = engine.scheduler().generation();

    engine
        .execute(PlayerCommand::SetAutoAdvance { enabled: false })
        .unwrap();
    assert!(!engine.fire_pending_advance(generation));
    assert_eq!(engine.phase(), GamePhase::LevelCleared);
    assert_eq!(engine.scheduler().schedule(), Schedule::Stopped);

    engine.execute(PlayerCommand::AdvanceLevel).unwrap();
    assert_eq!(engine.level(), 2);
    assert_eq!(engine.phase(), GamePhase::Running);
}

#[test]
fn test_manual_advance_only_when_cleared() {
    let mut engine = running_engine(SimConfig {
        auto_advance: false,
        ..Default::default()
    });
    assert!(matches!(
        engine.execute(PlayerCommand::AdvanceLevel),
        Err(CommandError::InvalidPhase(GamePhase::Running))
    ));

    let wave = &mut engine.progression_mut().wave;
    wave.spawned = wave.quota;
    engine.roster_mut().pollutants.clear();
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::LevelCleared);
    assert_eq!(engine.scheduler().schedule(), Schedule::Stopped);
    engine.execute(PlayerCommand::AdvanceLevel).unwrap();
    assert_eq!(engine.level(), 2);
}

#[test]
fn test_all_communities_destroyed_ends_game() {
    let mut engine = running_engine(SimConfig::default());
    engine.ledger_mut().award_score(500);
    let wave = &mut engine.progression_mut().wave;
    wave.spawned = wave.quota;

    let roster = engine.roster_mut();
    roster.towers.clear();
    roster.pollutants.clear();
    let positions: Vec<Position> = roster.communities.iter().map(|c| c.position).collect();
    for (i, position) in positions.into_iter().enumerate() {
        roster.communities[i].health = 50;
        let id = roster.allocate_id();
        roster.pollutants.push(pollutant(id, position, 60, 1.2));
    }
    let generation = engine.scheduler().generation();

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Ended);
    assert!(snap.is_game_over());
    assert!(snap.communities.is_empty());
    assert_eq!(snap.score, 0);
    assert_eq!(
        count_events(&snap.events, |e| matches!(e, GameEvent::GameOver { .. })),
        1
    );
    assert_eq!(engine.scheduler().schedule(), Schedule::Stopped);

    let tick = engine.time().tick;
    assert!(engine.tick_for(generation).is_none());
    engine.tick();
    assert_eq!(engine.time().tick, tick);
}

#[test]
fn test_restart_cancels_previous_schedule() {
    let mut engine = running_engine(SimConfig::default());
    let old = engine.scheduler().generation();
    assert!(engine.tick_for(old).is_some());

    engine.ledger_mut().award_coins(100);
    engine.execute(PlayerCommand::Restart).unwrap();

    assert!(engine.tick_for(old).is_none());
    assert_eq!(engine.phase(), GamePhase::Running);
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.ledger().coins(), 0);
    assert_eq!(engine.time().tick, 0);
    let current = engine.scheduler().generation();
    assert!(engine.tick_for(current).is_some());
}

#[test]
fn test_start_game_rejected_mid_game() {
    let mut engine = running_engine(SimConfig::default());
    assert!(matches!(
        engine.execute(PlayerCommand::StartGame),
        Err(CommandError::InvalidPhase(GamePhase::Running))
    ));
}

#[test]
fn test_ids_are_never_reused() {
    let mut engine = running_engine(SimConfig::default());
    let before: Vec<EntityId> = engine.roster().towers.iter().map(|t| t.id).collect();
    engine.execute(PlayerCommand::Restart).unwrap();
    assert!(engine
        .roster()
        .towers
        .iter()
        .all(|t| !before.contains(&t.id)));
}

// ---- Economy ----

#[test]
fn test_purchases_need_an_active_game() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let result = engine.execute(PlayerCommand::BuyUpgrade {
        upgrade: UpgradeKind::Range,
    });
    assert!(matches!(
        result,
        Err(CommandError::Purchase(PurchaseError::NoActiveGame))
    ));
}

#[test]
fn test_rejected_purchase_is_a_no_op() {
    let mut engine = running_engine(SimConfig::default());
    let before = engine.scheduler().generation();
    let result = engine.execute(PlayerCommand::BuyUpgrade {
        upgrade: UpgradeKind::Speed,
    });
    assert!(matches!(
        result,
        Err(CommandError::Purchase(PurchaseError::InsufficientCoins { have: 0, need: 10 }))
    ));
    assert_eq!(engine.tower_stats().speed, 1.0);
    assert_eq!(engine.scheduler().generation(), before);
}

#[test]
fn test_permanent_upgrade_once_per_session() {
    let mut engine = running_engine(SimConfig::default());
    engine.ledger_mut().award_coins(100);
    let buy = PlayerCommand::BuyPermanent {
        upgrade: PermanentUpgrade::CommunityBuff,
    };
    engine.execute(buy.clone()).unwrap();
    assert!(matches!(
        engine.execute(buy),
        Err(CommandError::Purchase(PurchaseError::AlreadyOwned(
            PermanentUpgrade::CommunityBuff
        )))
    ));
    assert_eq!(engine.ledger().coins(), 50);
    let snap = engine.snapshot();
    assert!(snap.communities.iter().all(|c| c.tower_stats.is_some()));

    engine.execute(PlayerCommand::Restart).unwrap();
    assert!(!engine.upgrades().community_buff);
}

// ---- Scheduler wiring ----

#[test]
fn test_period_follows_speed_and_multiplier() {
    let mut engine = running_engine(SimConfig::default());
    assert_eq!(engine.scheduler().period_ms(), Some(300.0));

    engine.ledger_mut().award_coins(10);
    engine
        .execute(PlayerCommand::BuyUpgrade {
            upgrade: UpgradeKind::Speed,
        })
        .unwrap();
    let period = engine.scheduler().period_ms().unwrap();
    assert!((period - 250.0).abs() < 1e-9);

    engine.execute(PlayerCommand::CycleSpeed).unwrap();
    let period = engine.scheduler().period_ms().unwrap();
    assert!((period - 25.0).abs() < 1e-9);

    engine.execute(PlayerCommand::CycleSpeed).unwrap();
    engine.execute(PlayerCommand::CycleSpeed).unwrap();
    assert_eq!(engine.speed_multiplier(), 1.0);

    let snap = engine.snapshot();
    assert_eq!(
        count_events(&snap.events, |e| matches!(e, GameEvent::ScheduleChanged { .. })),
        4
    );
}

#[test]
fn test_speed_per_level_halves_period_on_advance() {
    let mut engine = staged_engine();
    engine.ledger_mut().award_coins(50);
    engine
        .execute(PlayerCommand::BuyPermanent {
            upgrade: PermanentUpgrade::SpeedPerLevel,
        })
        .unwrap();
    assert_eq!(engine.scheduler().period_ms(), Some(300.0));

    engine.tick();
    assert_eq!(engine.phase(), GamePhase::LevelCleared);
    let pending = engine.scheduler().generation();
    assert!(engine.fire_pending_advance(pending));

    assert_eq!(engine.tower_stats().speed, 2.0);
    let period = engine.scheduler().period_ms().unwrap();
    assert!((period - 150.0).abs() < 1e-9);
    assert_ne!(engine.scheduler().generation(), pending);
    let current = engine.scheduler().generation();
    assert!(engine.tick_for(current).is_some());
    let snap = engine.snapshot();
    assert!(snap
        .events
        .contains(&GameEvent::ScheduleChanged { period_ms: 150.0 }));
}

#[test]
fn test_speed_cycles_while_idle_without_arming() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.execute(PlayerCommand::CycleSpeed).unwrap();
    assert_eq!(engine.speed_multiplier(), 10.0);
    assert_eq!(engine.scheduler().schedule(), Schedule::Stopped);
}

// ---- Host commands ----

#[test]
fn test_resize_validates_surface() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .execute(PlayerCommand::Resize {
            width: 1024.0,
            height: 768.0,
        })
        .unwrap();
    assert_eq!(engine.config().surface.width, 1024.0);

    let result = engine.execute(PlayerCommand::Resize {
        width: 10.0,
        height: 768.0,
    });
    assert!(matches!(result, Err(CommandError::InvalidSurface(_))));
    assert_eq!(engine.config().surface.width, 1024.0);
}

#[test]
fn test_collect_missing_pickup_is_ignored() {
    let mut engine = running_engine(SimConfig::default());
    engine
        .execute(PlayerCommand::CollectPickup { id: EntityId(9999) })
        .unwrap();
    assert_eq!(engine.ledger().score(), 0);
}

#[test]
fn test_collect_pickup_adjusts_score() {
    let mut engine = staged_engine();
    let roster = engine.roster_mut();
    let can = roster.allocate_id();
    roster.pickups.push(crate::roster::Pickup {
        id: can,
        kind: PickupKind::Can,
        position: Position::new(10.0, 10.0),
        ticks_remaining: 5,
    });
    engine
        .execute(PlayerCommand::CollectPickup { id: can })
        .unwrap();
    assert_eq!(engine.ledger().score(), 15);
    assert!(engine.roster().pickups.is_empty());
}
