//! Economy ledger: score and coins, and the upgrade shop.
//!
//! Purchases are check-then-deduct. A rejected purchase leaves every piece
//! of state untouched.

use thiserror::Error;

use watershed_core::components::{BaseHealth, TowerStats, UpgradeState};
use watershed_core::constants::*;
use watershed_core::enums::{PermanentUpgrade, UpgradeKind};

use crate::roster::Roster;

/// Score and coin balances. Score never goes below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ledger {
    score: u64,
    coins: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("insufficient coins: have {have}, need {need}")]
    InsufficientCoins { have: u64, need: u64 },
    #[error("{0:?} already owned")]
    AlreadyOwned(PermanentUpgrade),
    #[error("no game in progress")]
    NoActiveGame,
}

impl Ledger {
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn award_score(&mut self, amount: u64) {
        self.score += amount;
    }

    pub fn award_coins(&mut self, amount: u64) {
        self.coins += amount;
    }

    /// A pollutant shot down: +10 score and its coin value.
    pub fn award_kill(&mut self, coin_value: u64) {
        self.score += KILL_SCORE;
        self.coins += coin_value;
    }

    /// Deduct score, flooring at zero.
    pub fn penalize(&mut self, amount: u64) {
        self.score = self.score.saturating_sub(amount);
    }

    pub fn apply_score_delta(&mut self, delta: i64) {
        if delta >= 0 {
            self.award_score(delta.unsigned_abs());
        } else {
            self.penalize(delta.unsigned_abs());
        }
    }

    pub fn try_spend(&mut self, price: u64) -> Result<(), PurchaseError> {
        if self.coins < price {
            return Err(PurchaseError::InsufficientCoins {
                have: self.coins,
                need: price,
            });
        }
        self.coins -= price;
        Ok(())
    }
}

/// Buy a repeatable upgrade. Stat changes land on the shared stat block, so
/// every tower sees them at once; bullets already in flight keep their power.
pub fn buy_upgrade(
    ledger: &mut Ledger,
    stats: &mut TowerStats,
    base_health: &mut BaseHealth,
    roster: &mut Roster,
    upgrade: UpgradeKind,
) -> Result<(), PurchaseError> {
    ledger.try_spend(upgrade.price())?;
    match upgrade {
        UpgradeKind::Power => stats.power += UPGRADE_POWER_STEP,
        UpgradeKind::Range => stats.range += UPGRADE_RANGE_STEP,
        UpgradeKind::Speed => stats.speed += UPGRADE_SPEED_STEP,
        UpgradeKind::CommunityHealth => {
            base_health.community += UPGRADE_COMMUNITY_HEALTH_STEP;
            for community in roster.communities.iter_mut().filter(|c| c.alive) {
                community.health += UPGRADE_COMMUNITY_HEALTH_STEP;
            }
        }
    }
    Ok(())
}

/// Buy a permanent upgrade. Each can be bought once per session.
/// Per-level effects are applied by the progression controller; only the
/// community buff and HP scaling act immediately.
pub fn buy_permanent(
    ledger: &mut Ledger,
    upgrades: &mut UpgradeState,
    base_health: &mut BaseHealth,
    roster: &mut Roster,
    level: u32,
    upgrade: PermanentUpgrade,
) -> Result<(), PurchaseError> {
    if upgrades.is_active(upgrade) {
        return Err(PurchaseError::AlreadyOwned(upgrade));
    }
    ledger.try_spend(upgrade.price())?;
    upgrades.activate(upgrade);

    match upgrade {
        PermanentUpgrade::CommunityBuff => grant_community_stats(roster),
        PermanentUpgrade::FullHp => scale_health_to_level(base_health, roster, level),
        PermanentUpgrade::PowerPerLevel
        | PermanentUpgrade::SpeedPerLevel
        | PermanentUpgrade::ExtraTowers => {}
    }
    Ok(())
}

pub fn grant_community_stats(roster: &mut Roster) {
    for community in roster.communities.iter_mut() {
        community.has_tower_stats = true;
    }
}

/// Set tower and community base health to 100 x level and heal every tower
/// and community to it.
pub fn scale_health_to_level(base_health: &mut BaseHealth, roster: &mut Roster, level: u32) {
    let health = FULL_HP_PER_LEVEL * i64::from(level);
    base_health.tower = health;
    base_health.community = health;
    for tower in roster.towers.iter_mut() {
        tower.health = health;
    }
    for community in roster.communities.iter_mut() {
        community.health = health;
    }
}
