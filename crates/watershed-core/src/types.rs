//! Fundamental geometric and simulation types.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position on the play surface. Origin is the top-left corner,
/// entity positions are the top-left corner of their bounding box.
pub type Position = DVec2;

/// Stable identifier for a live entity. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bounded 2D surface the host provides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: crate::constants::DEFAULT_SURFACE_WIDTH,
            height: crate::constants::DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest valid top-left corner for an entity of the given size.
    /// Never negative, even on a surface smaller than the entity.
    pub fn max_origin(&self, size: f64) -> Position {
        Position::new((self.width - size).max(0.0), (self.height - size).max(0.0))
    }

    /// Clamp a requested top-left corner into `[0, w - size] x [0, h - size]`.
    pub fn clamp(&self, position: Position, size: f64) -> Position {
        position.clamp(Position::ZERO, self.max_origin(size))
    }
}

/// Simulation time tracking. The simulation has no wall clock; only ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Ticks executed since the current game started.
    pub tick: u64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
