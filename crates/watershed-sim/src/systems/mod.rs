//! Systems that advance the simulation each tick.
//!
//! Systems are plain functions over the roster and the pieces of session
//! state they touch. They do not own state.

pub mod bullets;
pub mod cleanup;
pub mod fire_control;
pub mod merge;
pub mod pickups;
pub mod pollutant_ai;
pub mod snapshot;
pub mod wave_spawner;
