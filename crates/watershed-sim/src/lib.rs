//! Headless simulation for Watershed.
//!
//! Owns the entity roster, runs the combat systems one tick at a time and
//! produces GameStateSnapshots for the host.

pub mod economy;
pub mod engine;
pub mod progression;
pub mod roster;
pub mod scheduler;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use watershed_core as core;

#[cfg(test)]
mod tests;
