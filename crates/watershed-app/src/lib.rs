//! Watershed host process.
//!
//! Runs the simulation engine on its own thread, paced by the engine's tick
//! scheduler, and exposes a command channel plus the latest snapshot.

pub mod autoplay;
pub mod game_loop;
pub mod logging;
pub mod state;

pub use watershed_core as core;
