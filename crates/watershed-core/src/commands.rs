//! Player commands sent from the host to the simulation.
//!
//! Commands are applied between ticks, never during one.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session ---
    /// Start a game from the title screen or after game over. Rejected while
    /// a game is in progress; use `Restart`.
    StartGame,
    /// Tear down the current game and start again at level 1.
    Restart,
    /// Move to the next level while the field is clear.
    AdvanceLevel,

    // --- Shop ---
    BuyUpgrade { upgrade: UpgradeKind },
    BuyPermanent { upgrade: PermanentUpgrade },

    // --- Timing ---
    /// Step through the configured speed multipliers (x1 -> x10 -> x100 -> x1).
    CycleSpeed,
    /// Toggle whether a cleared level advances on its own.
    SetAutoAdvance { enabled: bool },

    // --- Host ---
    /// The host surface changed size.
    Resize { width: f64, height: f64 },
    /// The player clicked a pickup.
    CollectPickup { id: EntityId },
}
