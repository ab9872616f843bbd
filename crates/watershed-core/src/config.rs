//! Session configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::types::Surface;

/// Configuration for starting a new simulation. Every field has a default,
/// so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same session.
    pub seed: u64,
    pub surface: Surface,
    /// Tick period at tower speed 1.0 and multiplier x1.
    pub base_tick_delay_ms: f64,
    /// Multipliers `CycleSpeed` steps through; the first is the initial one.
    pub speed_levels: Vec<f64>,
    /// Whether a cleared level advances without player input.
    pub auto_advance: bool,
    /// Pause between clearing a level and auto-advancing.
    pub auto_advance_delay_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            surface: Surface::default(),
            base_tick_delay_ms: BASE_TICK_DELAY_MS,
            speed_levels: DEFAULT_SPEED_LEVELS.to_vec(),
            auto_advance: true,
            auto_advance_delay_ms: AUTO_ADVANCE_DELAY_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("surface {width}x{height} cannot hold a {min}-unit entity")]
    SurfaceTooSmall { width: f64, height: f64, min: f64 },
    #[error("base tick delay must be a positive number of milliseconds, got {0}")]
    InvalidTickDelay(f64),
    #[error("at least one speed level is required")]
    NoSpeedLevels,
    #[error("speed level {0} must be positive and finite")]
    InvalidSpeedLevel(f64),
}

impl SimConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = COMMUNITY_SIZE.max(TOWER_SIZE).max(PICKUP_SIZE);
        let Surface { width, height } = self.surface;
        if !(width.is_finite() && height.is_finite()) || width <= min || height <= min {
            return Err(ConfigError::SurfaceTooSmall { width, height, min });
        }
        if !(self.base_tick_delay_ms.is_finite() && self.base_tick_delay_ms > 0.0) {
            return Err(ConfigError::InvalidTickDelay(self.base_tick_delay_ms));
        }
        if self.speed_levels.is_empty() {
            return Err(ConfigError::NoSpeedLevels);
        }
        if let Some(&bad) = self
            .speed_levels
            .iter()
            .find(|s| !(s.is_finite() && **s > 0.0))
        {
            return Err(ConfigError::InvalidSpeedLevel(bad));
        }
        Ok(())
    }
}
