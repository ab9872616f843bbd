//! Headless player: decides which commands to send after each snapshot.
//!
//! Permanent upgrades come first. Repeatable upgrades are bought in
//! rotation with whatever is left above the price of the cheapest
//! permanent upgrade still missing.

use watershed_core::commands::PlayerCommand;
use watershed_core::enums::{GamePhase, PermanentUpgrade, UpgradeKind};
use watershed_core::state::GameStateSnapshot;

const PERMANENT_PRIORITY: [PermanentUpgrade; 5] = [
    PermanentUpgrade::PowerPerLevel,
    PermanentUpgrade::ExtraTowers,
    PermanentUpgrade::SpeedPerLevel,
    PermanentUpgrade::FullHp,
    PermanentUpgrade::CommunityBuff,
];

#[derive(Debug, Default)]
pub struct Autoplay {
    next_upgrade: usize,
}

impl Autoplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to send in response to `snapshot`.
    pub fn respond(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if !matches!(snapshot.phase, GamePhase::Running | GamePhase::LevelCleared) {
            return commands;
        }

        let mut budget = snapshot.coins;
        let missing: Vec<PermanentUpgrade> = PERMANENT_PRIORITY
            .into_iter()
            .filter(|u| !snapshot.upgrades.is_active(*u))
            .collect();

        if let Some(&upgrade) = missing.iter().find(|u| u.price() <= budget) {
            budget -= upgrade.price();
            commands.push(PlayerCommand::BuyPermanent { upgrade });
        }

        let reserve = missing
            .iter()
            .filter(|u| !commands.contains(&PlayerCommand::BuyPermanent { upgrade: **u }))
            .map(|u| u.price())
            .min()
            .unwrap_or(0);
        while budget >= reserve + UpgradeKind::ALL[self.next_upgrade].price() {
            let upgrade = UpgradeKind::ALL[self.next_upgrade];
            budget -= upgrade.price();
            commands.push(PlayerCommand::BuyUpgrade { upgrade });
            self.next_upgrade = (self.next_upgrade + 1) % UpgradeKind::ALL.len();
        }

        if snapshot.phase == GamePhase::LevelCleared && !snapshot.auto_advance {
            commands.push(PlayerCommand::AdvanceLevel);
        }
        commands
    }
}
