//! Game loop thread: owns the simulation engine and paces it by the
//! engine's tick scheduler.
//!
//! The engine is created inside this thread, so it never crosses threads.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for polling and optionally pushed to an observer channel.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use watershed_core::config::SimConfig;
use watershed_core::state::GameStateSnapshot;
use watershed_sim::scheduler::Schedule;
use watershed_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Where published snapshots go.
struct Outlet<'a> {
    latest: &'a Mutex<Option<GameStateSnapshot>>,
    observer: Option<mpsc::Sender<GameStateSnapshot>>,
}

impl Outlet<'_> {
    fn publish(&mut self, snapshot: GameStateSnapshot) {
        if let Some(observer) = &self.observer {
            if observer.send(snapshot.clone()).is_err() {
                // Receiver hung up; stop cloning for it.
                self.observer = None;
            }
        }
        if let Ok(mut lock) = self.latest.lock() {
            *lock = Some(snapshot);
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    observer: Option<mpsc::Sender<GameStateSnapshot>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("watershed-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config);
            let mut outlet = Outlet {
                latest: &latest_snapshot,
                observer,
            };
            run_game_loop(engine, &cmd_rx, &mut outlet);
        })?;

    Ok((cmd_tx, handle))
}

/// Convert a scheduler period to a sleepable duration.
fn period_duration(period_ms: f64) -> Duration {
    let nanos = (period_ms * 1_000_000.0).round();
    if nanos.is_finite() && nanos >= 1.0 {
        Duration::from_nanos(nanos as u64)
    } else {
        Duration::from_millis(1)
    }
}

/// How long to wait after arming `schedule` before it first fires.
fn first_wait(schedule: Schedule) -> Option<Duration> {
    match schedule {
        Schedule::Stopped => None,
        Schedule::Repeating { period_ms } => Some(period_duration(period_ms)),
        Schedule::AdvancePending { delay_ms } => Some(Duration::from_millis(delay_ms)),
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    outlet: &mut Outlet<'_>,
) {
    let mut armed_generation: Option<u64> = None;
    let mut deadline = Instant::now();

    loop {
        // 1. Drain all pending commands
        let mut applied = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(msg) => {
                    if let Flow::Stop = apply(&mut engine, msg) {
                        return;
                    }
                    applied = true;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if applied {
            outlet.publish(engine.snapshot());
        }

        // 2. Re-arm if the scheduler changed under us
        let generation = engine.scheduler().generation();
        let schedule = engine.scheduler().schedule();
        if armed_generation != Some(generation) {
            armed_generation = Some(generation);
            if let Some(wait) = first_wait(schedule) {
                deadline = Instant::now() + wait;
            }
            debug!(generation, ?schedule, "timer armed");
        }

        // 3. Wait for the deadline, or for a command if nothing is armed
        let now = Instant::now();
        let due = match schedule {
            Schedule::Stopped => false,
            _ => now >= deadline,
        };
        if !due {
            let msg = match schedule {
                Schedule::Stopped => cmd_rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
                _ => cmd_rx.recv_timeout(deadline - now),
            };
            match msg {
                Ok(msg) => {
                    if let Flow::Stop = apply(&mut engine, msg) {
                        return;
                    }
                    outlet.publish(engine.snapshot());
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            }
            continue;
        }

        // 4. Fire whatever is due
        match schedule {
            Schedule::Repeating { period_ms } => {
                if let Some(snapshot) = engine.tick_for(generation) {
                    outlet.publish(snapshot);
                }
                let period = period_duration(period_ms);
                deadline += period;
                let now = Instant::now();
                if now.saturating_duration_since(deadline) > period * 2 {
                    // Too far behind; reset to avoid a catch-up spiral
                    deadline = now;
                }
            }
            Schedule::AdvancePending { .. } => {
                if engine.fire_pending_advance(generation) {
                    info!(level = engine.level(), "auto-advanced");
                }
                outlet.publish(engine.snapshot());
            }
            Schedule::Stopped => {}
        }
    }
}

/// Apply one host message to the engine.
fn apply(engine: &mut SimulationEngine, msg: GameLoopCommand) -> Flow {
    match msg {
        GameLoopCommand::PlayerCommand(command) => {
            // Rejections are logged by the engine and leave state untouched.
            let _ = engine.execute(command);
            Flow::Continue
        }
        GameLoopCommand::Shutdown => Flow::Stop,
    }
}
