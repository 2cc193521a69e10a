//! Playable characters and their traits

use serde::{Deserialize, Serialize};

use super::progression::{StatKey, StatMultipliers};
use super::projectile::Weapon;

/// Per-character special rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trait {
    /// Extra damage against enemies close to the player
    CloseDamage,
    /// Leaves damaging fire patches while moving
    FireTrail,
    /// Currency pickups may grant a temporary potion buff
    Potions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    Gnorp,
    Ignis,
    Fizzle,
}

impl Character {
    pub fn name(&self) -> &'static str {
        match self {
            Character::Gnorp => "Gnorp the Pyromaniac",
            Character::Ignis => "Ignis the Arsonist",
            Character::Fizzle => "Fizzle the Alchemist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gnorp" => Some(Character::Gnorp),
            "ignis" => Some(Character::Ignis),
            "fizzle" => Some(Character::Fizzle),
            _ => None,
        }
    }

    pub fn weapon(&self) -> Weapon {
        match self {
            Character::Gnorp => Weapon::Inferno,
            Character::Ignis => Weapon::Flame,
            Character::Fizzle => Weapon::Orb,
        }
    }

    pub fn trait_kind(&self) -> Trait {
        match self {
            Character::Gnorp => Trait::CloseDamage,
            Character::Ignis => Trait::FireTrail,
            Character::Fizzle => Trait::Potions,
        }
    }

    /// Movement speed before the speed multiplier
    pub fn base_speed(&self) -> f32 {
        match self {
            Character::Gnorp => 2.5,
            Character::Ignis => 3.6,
            Character::Fizzle => 3.0,
        }
    }

    /// Shield capacity (absorbed before health)
    pub fn shield_max(&self) -> f32 {
        match self {
            Character::Fizzle => 30.0,
            _ => 0.0,
        }
    }

    /// Starting multiplier for a stat
    pub fn starting_multiplier(&self, key: StatKey) -> f32 {
        match (self, key) {
            (Character::Gnorp, StatKey::Damage) => 1.3,
            (Character::Gnorp, StatKey::ProjectileSize) => 1.1,
            (Character::Ignis, StatKey::Damage) => 0.9,
            (Character::Ignis, StatKey::FireRate) => 1.2,
            _ => 1.0,
        }
    }

    /// Fold the character's starting multipliers into the run stats
    pub fn apply_to(&self, stats: &mut StatMultipliers) {
        for key in [StatKey::Damage, StatKey::FireRate, StatKey::ProjectileSize] {
            stats.scale(key, self.starting_multiplier(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gnorp_starting_stats() {
        let mut stats = StatMultipliers::default();
        Character::Gnorp.apply_to(&mut stats);
        assert!((stats.damage - 1.3).abs() < 1e-6);
        assert!((stats.projectile_size - 1.1).abs() < 1e-6);
        assert_eq!(stats.fire_rate, 1.0);
        assert_eq!(stats.speed, 1.0);
    }

    #[test]
    fn test_only_fizzle_has_shield() {
        assert_eq!(Character::Gnorp.shield_max(), 0.0);
        assert_eq!(Character::Ignis.shield_max(), 0.0);
        assert!(Character::Fizzle.shield_max() > 0.0);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Character::from_str("IGNIS"), Some(Character::Ignis));
        assert_eq!(Character::from_str("bob"), None);
    }
}
