//! Entity records
//!
//! Every combatant (player, enemies, bosses) shares one `Entity` record.
//! Bosses additionally carry a `CombatBehavior` capability that owns their
//! ability state machine and hit interception.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::{BossKind, CombatBehavior};
use crate::consts::{ELLIPSE_HEIGHT_FRACTION, ELLIPSE_WIDTH_FRACTION};

/// Who a projectile or hazard belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// The faction this one harms
    pub fn opposing(self) -> Self {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }
}

/// Cosmetic animation tag (never read by combat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Walk,
    Attack,
    Hurt,
    Death,
}

/// Regular enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    DebtSkeleton,
    LoanerImp,
    BailiffOgre,
}

/// Strength tier of a regular enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTier {
    Basic,
    Elite,
}

impl EnemyKind {
    pub fn tier(&self) -> EnemyTier {
        match self {
            Self::DebtSkeleton | Self::LoanerImp => EnemyTier::Basic,
            Self::BailiffOgre => EnemyTier::Elite,
        }
    }

    pub fn max_hp(&self) -> f32 {
        match self {
            Self::DebtSkeleton => 10.0,
            Self::LoanerImp => 20.0,
            Self::BailiffOgre => 150.0,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            Self::DebtSkeleton => 1.0,
            Self::LoanerImp => 2.0,
            Self::BailiffOgre => 0.75,
        }
    }

    /// Hit size (half of the 32px sprite frame)
    pub fn size(&self) -> f32 {
        16.0
    }

    pub fn contact_damage(&self) -> f32 {
        match self {
            Self::DebtSkeleton | Self::LoanerImp => 5.0,
            Self::BailiffOgre => 10.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DebtSkeleton => "Debt Skeleton",
            Self::LoanerImp => "Loaner Imp",
            Self::BailiffOgre => "Bailiff Ogre",
        }
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy(EnemyKind),
    Boss(BossKind),
}

/// Coarse variant used by presentation and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityVariant {
    Player,
    BasicEnemy,
    EliteEnemy,
    Boss,
}

impl EntityKind {
    pub fn variant(&self) -> EntityVariant {
        match self {
            EntityKind::Player => EntityVariant::Player,
            EntityKind::Enemy(kind) => match kind.tier() {
                EnemyTier::Basic => EntityVariant::BasicEnemy,
                EnemyTier::Elite => EntityVariant::EliteEnemy,
            },
            EntityKind::Boss(_) => EntityVariant::Boss,
        }
    }
}

/// Per-archetype movement timers for regular enemies
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MotionState {
    /// Imp wobble phase (radians)
    pub wobble_angle: f32,
    /// Ogre charge cooldown (ticks)
    pub charge_cooldown: u32,
}

/// A live combatant
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Movement intent applied this tick (informational)
    pub vel: Vec2,
    /// Hit size; the hit ellipse is derived from it
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub faction: Faction,
    pub anim: AnimState,
    pub speed: f32,
    pub contact_damage: f32,
    pub motion: MotionState,
    /// Boss capability: ability state machine and hit interception
    pub behavior: Option<CombatBehavior>,
}

impl Entity {
    /// A regular enemy at `pos`
    pub fn enemy(id: u32, kind: EnemyKind, pos: Vec2, wobble_angle: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Enemy(kind),
            pos,
            vel: Vec2::ZERO,
            size: kind.size(),
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            faction: Faction::Enemy,
            anim: AnimState::Walk,
            speed: kind.speed(),
            contact_damage: kind.contact_damage(),
            motion: MotionState {
                wobble_angle,
                charge_cooldown: 0,
            },
            behavior: None,
        }
    }

    /// A scripted boss with its ability state machine attached
    pub fn boss(id: u32, kind: BossKind, pos: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Boss(kind),
            pos,
            vel: Vec2::ZERO,
            size: kind.size(),
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            faction: Faction::Enemy,
            anim: AnimState::Walk,
            speed: kind.speed(),
            contact_damage: 0.0,
            motion: MotionState::default(),
            behavior: Some(CombatBehavior::new(kind)),
        }
    }

    /// The player's body
    pub fn player(id: u32, pos: Vec2, size: f32, max_hp: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Player,
            pos,
            vel: Vec2::ZERO,
            size,
            hp: max_hp,
            max_hp,
            faction: Faction::Player,
            anim: AnimState::Idle,
            speed: 0.0,
            contact_damage: 0.0,
            motion: MotionState::default(),
            behavior: None,
        }
    }

    /// Semi-axes of the hit ellipse (biased taller than wide)
    #[inline]
    pub fn hit_ellipse(&self) -> Vec2 {
        Vec2::new(
            self.size * ELLIPSE_WIDTH_FRACTION,
            self.size * ELLIPSE_HEIGHT_FRACTION,
        )
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EntityKind::Boss(_))
    }

    /// Subtract health directly (no interception)
    pub fn apply_damage(&mut self, amount: f32) {
        if amount > 0.0 {
            self.hp -= amount;
        }
    }

    /// Restore health, never above max
    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 {
            self.hp = (self.hp + amount).min(self.max_hp);
        }
    }

    /// Step toward `target` by `step`, stopping on it
    pub fn step_toward(&mut self, target: Vec2, step: f32) {
        let to = target - self.pos;
        let dist = to.length();
        if dist > 1e-4 {
            let moved = to / dist * step.min(dist);
            self.pos += moved;
            self.vel = moved;
        } else {
            self.vel = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants() {
        assert_eq!(EntityKind::Player.variant(), EntityVariant::Player);
        assert_eq!(
            EntityKind::Enemy(EnemyKind::DebtSkeleton).variant(),
            EntityVariant::BasicEnemy
        );
        assert_eq!(
            EntityKind::Enemy(EnemyKind::BailiffOgre).variant(),
            EntityVariant::EliteEnemy
        );
        assert_eq!(
            EntityKind::Boss(BossKind::InterestDragon).variant(),
            EntityVariant::Boss
        );
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut e = Entity::enemy(1, EnemyKind::LoanerImp, Vec2::ZERO, 0.0);
        e.apply_damage(5.0);
        e.heal(100.0);
        assert_eq!(e.hp, e.max_hp);
    }

    #[test]
    fn test_hit_ellipse_is_taller_than_wide() {
        let e = Entity::enemy(1, EnemyKind::DebtSkeleton, Vec2::ZERO, 0.0);
        let axes = e.hit_ellipse();
        assert!(axes.y > axes.x);
    }

    #[test]
    fn test_step_toward_does_not_overshoot() {
        let mut e = Entity::enemy(1, EnemyKind::DebtSkeleton, Vec2::ZERO, 0.0);
        e.step_toward(Vec2::new(0.5, 0.0), 2.0);
        assert!((e.pos.x - 0.5).abs() < 1e-5);
    }
}
