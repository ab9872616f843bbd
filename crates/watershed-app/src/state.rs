//! State shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use watershed_core::commands::PlayerCommand;
use watershed_core::config::SimConfig;
use watershed_core::state::GameStateSnapshot;

use crate::game_loop;

/// Messages sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop thread has exited")]
    LoopGone,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle to a running game loop.
///
/// - `command_tx` is `None` until `start_simulation` succeeds.
/// - `latest_snapshot` is shared with the loop thread and replaced after
///   every tick or applied command.
pub struct AppState {
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            thread: Mutex::new(None),
        }
    }

    /// Spawn the game loop. `observer`, if given, receives a copy of every
    /// published snapshot.
    pub fn start_simulation(
        &self,
        config: SimConfig,
        observer: Option<mpsc::Sender<GameStateSnapshot>>,
    ) -> Result<(), HostError> {
        let mut tx_lock = self.command_tx.lock().map_err(|_| HostError::Poisoned)?;
        if tx_lock.is_some() {
            return Err(HostError::AlreadyRunning);
        }

        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(config, self.latest_snapshot.clone(), observer)?;
        *tx_lock = Some(cmd_tx);
        *self.thread.lock().map_err(|_| HostError::Poisoned)? = Some(handle);
        Ok(())
    }

    /// Forward a player command to the game loop.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), HostError> {
        let tx_lock = self.command_tx.lock().map_err(|_| HostError::Poisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|_| HostError::LoopGone),
            None => Err(HostError::NotStarted),
        }
    }

    /// Latest published snapshot, for polling.
    pub fn snapshot(&self) -> Result<Option<GameStateSnapshot>, HostError> {
        let lock = self.latest_snapshot.lock().map_err(|_| HostError::Poisoned)?;
        Ok(lock.clone())
    }

    /// Stop the game loop and wait for its thread to exit.
    pub fn shutdown(&self) -> Result<(), HostError> {
        if let Some(tx) = self.command_tx.lock().map_err(|_| HostError::Poisoned)?.take() {
            // The loop may already have exited on its own.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        let handle = self.thread.lock().map_err(|_| HostError::Poisoned)?.take();
        if let Some(handle) = handle {
            handle.join().map_err(|_| HostError::LoopGone)?;
        }
        Ok(())
    }
}
