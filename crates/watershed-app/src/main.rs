use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use watershed_app::autoplay::Autoplay;
use watershed_app::logging;
use watershed_app::state::AppState;
use watershed_core::commands::PlayerCommand;
use watershed_core::components::{TowerStats, UpgradeState};
use watershed_core::config::SimConfig;
use watershed_core::enums::GamePhase;
use watershed_core::state::GameStateSnapshot;
use watershed_core::types::Surface;

/// Run a headless Watershed session with an automatic player and print a
/// JSON summary of how it went.
#[derive(Debug, Parser)]
#[command(name = "watershed", version, about)]
struct Args {
    /// JSON session config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Initial speed multiplier; becomes the first entry of the speed cycle.
    #[arg(long, default_value_t = 100.0)]
    speed: f64,
    /// Stop once this level is reached.
    #[arg(long, default_value_t = 5)]
    max_level: u32,
    /// Stop after this many ticks.
    #[arg(long, default_value_t = 5000)]
    max_ticks: u64,
    /// Disable auto-advance; the player advances cleared levels itself.
    #[arg(long)]
    manual_advance: bool,
    /// More logging (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    phase: GamePhase,
    level: u32,
    ticks: u64,
    score: u64,
    coins: u64,
    communities: usize,
    towers: usize,
    tower_stats: TowerStats,
    upgrades: UpgradeState,
}

impl Summary {
    fn new(seed: u64, snapshot: &GameStateSnapshot) -> Self {
        Self {
            seed,
            phase: snapshot.phase,
            level: snapshot.level,
            ticks: snapshot.time.tick,
            score: snapshot.score,
            coins: snapshot.coins,
            communities: snapshot.communities.len(),
            towers: snapshot.towers.len(),
            tower_stats: snapshot.tower_stats,
            upgrades: snapshot.upgrades,
        }
    }
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SimConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.width.is_some() || args.height.is_some() {
        config.surface = Surface::new(
            args.width.unwrap_or(config.surface.width),
            args.height.unwrap_or(config.surface.height),
        );
    }
    config.speed_levels.retain(|s| *s != args.speed);
    config.speed_levels.insert(0, args.speed);
    if args.manual_advance {
        config.auto_advance = false;
    }

    config.validate().context("invalid session config")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(logging::filter_for_verbosity(args.verbose));

    let config = load_config(&args)?;
    let seed = config.seed;
    info!(seed, speed = args.speed, max_level = args.max_level, "starting session");

    let state = AppState::new();
    let (obs_tx, obs_rx) = mpsc::channel();
    state.start_simulation(config, Some(obs_tx))?;
    state.send_command(PlayerCommand::StartGame)?;

    let mut player = Autoplay::new();
    let mut last: Option<GameStateSnapshot> = None;
    while let Ok(snapshot) = obs_rx.recv() {
        let done = snapshot.phase == GamePhase::Ended
            || snapshot.level >= args.max_level
            || snapshot.time.tick >= args.max_ticks;
        if !done {
            for command in player.respond(&snapshot) {
                state.send_command(command)?;
            }
        }
        last = Some(snapshot);
        if done {
            break;
        }
    }
    state.shutdown()?;

    let Some(last) = last else {
        bail!("game loop exited before publishing a snapshot");
    };
    if last.phase == GamePhase::Idle {
        warn!("session never started");
    }
    let summary = Summary::new(seed, &last);
    info!(level = summary.level, score = summary.score, "session finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
