//! Progression store
//!
//! Two layers:
//! - run-scoped stat multipliers (reset every run, mutated by level-ups,
//!   buffs and loans)
//! - permanent upgrade levels bought with inferno gems (persisted)

use serde::{Deserialize, Serialize};

use crate::consts::{MAGNET_BASE_RADIUS, MAGNET_RADIUS_PER_LEVEL, MAX_UPGRADE_LEVEL};

/// Run-scoped stats that level-ups and buffs scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    Speed,
    FireRate,
    Damage,
    ProjectileSize,
}

impl StatKey {
    pub const ALL: [StatKey; 4] = [
        StatKey::Speed,
        StatKey::FireRate,
        StatKey::Damage,
        StatKey::ProjectileSize,
    ];
}

/// Positive multipliers keyed by `StatKey`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatMultipliers {
    pub speed: f32,
    pub fire_rate: f32,
    pub damage: f32,
    pub projectile_size: f32,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            speed: 1.0,
            fire_rate: 1.0,
            damage: 1.0,
            projectile_size: 1.0,
        }
    }
}

impl StatMultipliers {
    pub fn get(&self, key: StatKey) -> f32 {
        match key {
            StatKey::Speed => self.speed,
            StatKey::FireRate => self.fire_rate,
            StatKey::Damage => self.damage,
            StatKey::ProjectileSize => self.projectile_size,
        }
    }

    fn get_mut(&mut self, key: StatKey) -> &mut f32 {
        match key {
            StatKey::Speed => &mut self.speed,
            StatKey::FireRate => &mut self.fire_rate,
            StatKey::Damage => &mut self.damage,
            StatKey::ProjectileSize => &mut self.projectile_size,
        }
    }

    /// Multiply a stat by `factor`. Non-positive or non-finite factors are ignored
    /// so multipliers stay positive.
    pub fn scale(&mut self, key: StatKey, factor: f32) -> bool {
        if !(factor > 0.0) || !factor.is_finite() {
            return false;
        }
        *self.get_mut(key) *= factor;
        true
    }
}

/// Permanent (cross-run) upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKey {
    /// +2 fanned shots per level
    Multishot,
    /// +1 wall bounce per level
    Bounce,
    /// +1 enemy pierce per level
    Pierce,
    /// +20 pickup magnet radius per level
    Magnet,
}

impl UpgradeKey {
    pub const ALL: [UpgradeKey; 4] = [
        UpgradeKey::Multishot,
        UpgradeKey::Bounce,
        UpgradeKey::Pierce,
        UpgradeKey::Magnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKey::Multishot => "multishot",
            UpgradeKey::Bounce => "bounce",
            UpgradeKey::Pierce => "pierce",
            UpgradeKey::Magnet => "magnet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "multishot" => Some(UpgradeKey::Multishot),
            "bounce" => Some(UpgradeKey::Bounce),
            "pierce" => Some(UpgradeKey::Pierce),
            "magnet" => Some(UpgradeKey::Magnet),
            _ => None,
        }
    }

    /// Gem cost multiplier per level
    pub fn cost_base(&self) -> u32 {
        1
    }
}

/// Persisted permanent-upgrade record (flat JSON object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermanentUpgrades {
    /// Inferno gems: meta currency earned from bosses
    pub gems: u32,
    pub multishot: u32,
    pub bounce: u32,
    pub pierce: u32,
    pub magnet: u32,
}

impl PermanentUpgrades {
    pub fn level(&self, key: UpgradeKey) -> u32 {
        match key {
            UpgradeKey::Multishot => self.multishot,
            UpgradeKey::Bounce => self.bounce,
            UpgradeKey::Pierce => self.pierce,
            UpgradeKey::Magnet => self.magnet,
        }
    }

    fn level_mut(&mut self, key: UpgradeKey) -> &mut u32 {
        match key {
            UpgradeKey::Multishot => &mut self.multishot,
            UpgradeKey::Bounce => &mut self.bounce,
            UpgradeKey::Pierce => &mut self.pierce,
            UpgradeKey::Magnet => &mut self.magnet,
        }
    }

    /// Gems needed for the next level
    pub fn cost(&self, key: UpgradeKey) -> u32 {
        key.cost_base() * (self.level(key) + 1)
    }

    pub fn can_buy(&self, key: UpgradeKey) -> bool {
        self.level(key) < MAX_UPGRADE_LEVEL && self.gems >= self.cost(key)
    }

    /// Spend gems on the next level. Returns the new level, or `None` when
    /// capped or unaffordable.
    pub fn buy(&mut self, key: UpgradeKey) -> Option<u32> {
        if !self.can_buy(key) {
            return None;
        }
        self.gems -= self.cost(key);
        let level = self.level_mut(key);
        *level += 1;
        Some(*level)
    }

    /// Whether every level is within the cap
    pub fn is_valid(&self) -> bool {
        UpgradeKey::ALL
            .iter()
            .all(|k| self.level(*k) <= MAX_UPGRADE_LEVEL)
    }
}

/// Stat multipliers for the current run plus the permanent upgrade levels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionStore {
    pub stats: StatMultipliers,
    pub permanent: PermanentUpgrades,
}

impl ProgressionStore {
    pub fn new(permanent: PermanentUpgrades) -> Self {
        Self {
            stats: StatMultipliers::default(),
            permanent,
        }
    }

    pub fn multiplier(&self, key: StatKey) -> f32 {
        self.stats.get(key)
    }

    /// Apply a level-up choice: stat *= (1 + bonus)
    pub fn apply_bonus(&mut self, key: StatKey, bonus: f32) -> bool {
        self.stats.scale(key, 1.0 + bonus)
    }

    pub fn level(&self, key: UpgradeKey) -> u32 {
        self.permanent.level(key)
    }

    /// Pickup magnet radius from the magnet upgrade
    pub fn magnet_radius(&self) -> f32 {
        MAGNET_BASE_RADIUS + MAGNET_RADIUS_PER_LEVEL * self.level(UpgradeKey::Magnet) as f32
    }

    /// Buy by string key; unknown keys are a no-op
    pub fn buy_named(&mut self, key: &str) -> Option<u32> {
        let key = UpgradeKey::from_str(key)?;
        self.permanent.buy(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_bonus_multiplies() {
        let mut store = ProgressionStore::default();
        assert!(store.apply_bonus(StatKey::Damage, 0.5));
        assert!(store.apply_bonus(StatKey::Damage, 1.0));
        assert!((store.multiplier(StatKey::Damage) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_rejects_non_positive() {
        let mut stats = StatMultipliers::default();
        assert!(!stats.scale(StatKey::Speed, 0.0));
        assert!(!stats.scale(StatKey::Speed, -2.0));
        assert!(!stats.scale(StatKey::Speed, f32::NAN));
        assert_eq!(stats.speed, 1.0);
    }

    #[test]
    fn test_buy_costs_grow_and_cap() {
        let mut up = PermanentUpgrades {
            gems: 1000,
            ..Default::default()
        };
        assert_eq!(up.buy(UpgradeKey::Bounce), Some(1));
        assert_eq!(up.gems, 999);
        assert_eq!(up.buy(UpgradeKey::Bounce), Some(2));
        assert_eq!(up.gems, 997);
        for _ in 0..20 {
            up.buy(UpgradeKey::Bounce);
        }
        assert_eq!(up.bounce, MAX_UPGRADE_LEVEL);
    }

    #[test]
    fn test_buy_unaffordable() {
        let mut up = PermanentUpgrades::default();
        assert_eq!(up.buy(UpgradeKey::Pierce), None);
        assert_eq!(up.pierce, 0);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut store = ProgressionStore::new(PermanentUpgrades {
            gems: 5,
            ..Default::default()
        });
        assert_eq!(store.buy_named("laser"), None);
        assert_eq!(store.permanent.gems, 5);
        assert_eq!(store.buy_named("Magnet"), Some(1));
    }

    #[test]
    fn test_magnet_radius() {
        let store = ProgressionStore::new(PermanentUpgrades {
            magnet: 2,
            ..Default::default()
        });
        assert_eq!(store.magnet_radius(), 150.0);
    }
}
