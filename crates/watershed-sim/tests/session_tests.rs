//! Whole-session runs through the public engine API.

use watershed_sim::core::commands::PlayerCommand;
use watershed_sim::core::enums::{GamePhase, UpgradeKind};
use watershed_sim::core::events::GameEvent;
use watershed_sim::core::state::GameStateSnapshot;
use watershed_sim::engine::{SimConfig, SimulationEngine};
use watershed_sim::scheduler::Schedule;

fn check_invariants(snap: &GameStateSnapshot, config: &SimConfig) {
    let surface = config.surface;
    for c in &snap.communities {
        assert!((0.0..=1.0).contains(&c.health_fraction));
        assert!(c.position.x >= 0.0 && c.position.x <= surface.width - 40.0);
        assert!(c.position.y >= 0.0 && c.position.y <= surface.height - 40.0);
    }
    for t in &snap.towers {
        assert!(t.health > 0);
        assert!(t.position.x >= 0.0 && t.position.x <= surface.width - 30.0);
        assert!(t.position.y >= 0.0 && t.position.y <= surface.height - 30.0);
        assert_eq!(t.power, snap.tower_stats.power);
    }
    for p in &snap.pollutants {
        assert!(p.hp > 0);
        assert!(p.speed >= 0.5);
    }
    assert!(snap.wave.spawned <= snap.wave.quota);
}

#[test]
fn test_autoplay_session_progresses() {
    let config = SimConfig {
        seed: 7,
        ..Default::default()
    };
    let mut engine = SimulationEngine::try_new(config.clone()).unwrap();
    engine.execute(PlayerCommand::StartGame).unwrap();

    let mut last_level = 1;
    let mut advances = 0;
    for _ in 0..4000 {
        let generation = engine.scheduler().generation();
        match engine.scheduler().schedule() {
            Schedule::Repeating { .. } => {
                let snap = engine.tick_for(generation).unwrap();
                check_invariants(&snap, &config);
                assert!(snap.level >= last_level);
                last_level = snap.level;
                advances += snap
                    .events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::LevelAdvanced { .. }))
                    .count();
            }
            Schedule::AdvancePending { .. } => {
                assert_eq!(engine.phase(), GamePhase::LevelCleared);
                assert!(engine.fire_pending_advance(generation));
            }
            Schedule::Stopped => {
                assert_eq!(engine.phase(), GamePhase::Ended);
                break;
            }
        }

        // Spend coins the way a careful player would.
        for upgrade in UpgradeKind::ALL {
            let _ = engine.execute(PlayerCommand::BuyUpgrade { upgrade });
        }
    }

    assert!(
        engine.level() > 1 || engine.phase() == GamePhase::Ended,
        "session stalled on the first wave"
    );
    // The advance event is drained by the following tick's snapshot.
    assert!(advances + 1 >= (engine.level() - 1) as usize);
}

#[test]
fn test_invalid_config_rejected() {
    let config = SimConfig {
        speed_levels: Vec::new(),
        ..Default::default()
    };
    assert!(SimulationEngine::try_new(config).is_err());
}
