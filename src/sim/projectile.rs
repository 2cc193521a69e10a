//! Projectiles and their motion
//!
//! Regular shots translate along a unit direction; shockwaves stay put and
//! grow. Walls reflect shots that still have bounces and consume the rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_wall_contact;
use super::entity::Faction;
use super::progression::{StatKey, UpgradeKey};
use super::state::{SimulationContext, WorldBounds};
use crate::consts::{MULTISHOT_SPREAD, PROJECTILE_CULL_MARGIN, SHOCKWAVE_TICKS};
use crate::{aim_or_default, rotate};

/// Player weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    /// Balanced blast
    #[default]
    Inferno,
    /// Fast, weak stream
    Flame,
    /// Slow, heavy orb
    Orb,
}

impl Weapon {
    pub fn base_damage(&self) -> f32 {
        match self {
            Weapon::Inferno => 2.0,
            Weapon::Flame => 1.0,
            Weapon::Orb => 6.0,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            Weapon::Inferno => 6.0,
            Weapon::Flame => 8.0,
            Weapon::Orb => 2.0,
        }
    }

    pub fn base_size(&self) -> f32 {
        match self {
            Weapon::Inferno => 5.0,
            Weapon::Flame => 3.0,
            Weapon::Orb => 10.0,
        }
    }

    /// Ticks between shots before the fire-rate multiplier
    pub fn base_cooldown(&self) -> u32 {
        match self {
            Weapon::Inferno => 15,
            Weapon::Flame => 3,
            Weapon::Orb => 45,
        }
    }

    /// `max(1, floor(base / fire_rate))`
    pub fn cooldown_ticks(&self, fire_rate: f32) -> u32 {
        let rate = if fire_rate > 0.0 { fire_rate } else { 1.0 };
        ((self.base_cooldown() as f32 / rate).floor() as u32).max(1)
    }
}

/// A moving (or expanding) damage carrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Damage dealt on hit (multipliers already applied)
    pub damage: f32,
    /// Damage before any player stat multiplier
    pub base_damage: f32,
    pub faction: Faction,
    pub pierce_left: u32,
    pub bounces_left: u32,
    /// Area-expanding: grows by `speed` per tick instead of moving
    pub shockwave: bool,
    pub age_ticks: u32,
    /// Entities already damaged by this projectile
    pub hit_ids: Vec<u32>,
}

impl Projectile {
    pub fn new(
        id: u32,
        pos: Vec2,
        dir: Vec2,
        speed: f32,
        radius: f32,
        damage: f32,
        faction: Faction,
    ) -> Self {
        Self {
            id,
            pos,
            dir: aim_or_default(dir),
            speed,
            radius,
            damage,
            base_damage: damage,
            faction,
            pierce_left: 0,
            bounces_left: 0,
            shockwave: false,
            age_ticks: 0,
            hit_ids: Vec::new(),
        }
    }

    pub fn with_base_damage(mut self, base: f32) -> Self {
        self.base_damage = base;
        self
    }

    pub fn with_pierce(mut self, pierce: u32) -> Self {
        self.pierce_left = pierce;
        self
    }

    pub fn with_bounces(mut self, bounces: u32) -> Self {
        self.bounces_left = bounces;
        self
    }

    pub fn as_shockwave(mut self) -> Self {
        self.shockwave = true;
        self
    }

    /// Whether this projectile already damaged entity `id`
    #[inline]
    pub fn has_hit(&self, id: u32) -> bool {
        self.hit_ids.contains(&id)
    }

    /// Record a hit; returns false if the projectile is now spent
    pub fn register_hit(&mut self, id: u32) -> bool {
        self.hit_ids.push(id);
        if self.shockwave {
            return true;
        }
        if self.pierce_left == 0 {
            return false;
        }
        self.pierce_left -= 1;
        true
    }

    /// Advance one tick. Returns false when the projectile should be removed.
    pub fn advance(&mut self, bounds: &WorldBounds) -> bool {
        self.age_ticks += 1;

        if self.shockwave {
            self.radius += self.speed;
            return self.age_ticks < SHOCKWAVE_TICKS;
        }

        self.pos += self.dir * self.speed;

        let contact = circle_wall_contact(self.pos, self.radius, self.dir, bounds);
        if contact.hit {
            if self.bounces_left == 0 {
                return false;
            }
            self.bounces_left -= 1;
            self.pos = contact.clamped;
            self.dir = contact.reflected;
        }

        !bounds.is_far_outside(self.pos, PROJECTILE_CULL_MARGIN + self.radius)
    }
}

/// Move every projectile one tick and drop the spent ones
pub fn step_projectiles(projectiles: &mut Vec<Projectile>, bounds: &WorldBounds) {
    projectiles.retain_mut(|p| p.advance(bounds));
}

/// Fire the player's current weapon from `origin` toward `aim`.
///
/// Multishot fans extra pellets symmetrically around the aim; bounce and
/// pierce levels are copied onto every pellet.
pub fn fire_player_weapon(state: &mut SimulationContext, origin: Vec2, aim: Vec2) -> usize {
    let weapon = state.player.weapon;
    let stats = state.progression.stats;
    let multishot = state.progression.level(UpgradeKey::Multishot);
    let bounces = state.progression.level(UpgradeKey::Bounce);
    let pierce = state.progression.level(UpgradeKey::Pierce);

    let aim = aim_or_default(aim);
    let base = weapon.base_damage();
    let damage = base * stats.get(StatKey::Damage);
    let radius = weapon.base_size() * stats.get(StatKey::ProjectileSize);

    let shots = 1 + 2 * multishot;
    let mid = (shots - 1) as f32 / 2.0;
    for i in 0..shots {
        let dir = rotate(aim, (i as f32 - mid) * MULTISHOT_SPREAD);
        let id = state.next_entity_id();
        let shot = Projectile::new(id, origin, dir, weapon.speed(), radius, damage, Faction::Player)
            .with_base_damage(base)
            .with_bounces(bounces)
            .with_pierce(pierce);
        state.projectiles.push(shot);
    }
    shots as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::progression::PermanentUpgrades;
    use proptest::prelude::*;

    fn shot(pos: Vec2, dir: Vec2, bounces: u32) -> Projectile {
        Projectile::new(1, pos, dir, 10.0, 5.0, 1.0, Faction::Player).with_bounces(bounces)
    }

    #[test]
    fn test_translates_by_speed() {
        let bounds = WorldBounds::new(200.0, 200.0);
        let mut p = shot(Vec2::new(50.0, 50.0), Vec2::new(0.0, 1.0), 0);
        assert!(p.advance(&bounds));
        assert!((p.pos.y - 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_then_removed() {
        let bounds = WorldBounds::new(100.0, 100.0);
        let mut projectiles = vec![shot(Vec2::new(98.0, 50.0), Vec2::new(1.0, 0.0), 1)];

        step_projectiles(&mut projectiles, &bounds);
        assert_eq!(projectiles.len(), 1);
        assert!(projectiles[0].dir.x < 0.0);
        assert_eq!(projectiles[0].bounces_left, 0);

        // Send it back into the right wall with nothing left
        projectiles[0].pos = Vec2::new(98.0, 50.0);
        projectiles[0].dir = Vec2::new(1.0, 0.0);
        step_projectiles(&mut projectiles, &bounds);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_bounce_keeps_hit_set() {
        let bounds = WorldBounds::new(100.0, 100.0);
        let mut p = shot(Vec2::new(98.0, 50.0), Vec2::new(1.0, 0.0), 2);
        p.hit_ids.push(42);
        assert!(p.advance(&bounds));
        assert!(p.has_hit(42));
    }

    #[test]
    fn test_shockwave_expands_and_expires() {
        let bounds = WorldBounds::new(200.0, 200.0);
        let mut projectiles = vec![
            Projectile::new(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 2.0, 1.0, 30.0, Faction::Enemy)
                .as_shockwave(),
        ];
        step_projectiles(&mut projectiles, &bounds);
        assert_eq!(projectiles[0].radius, 3.0);
        assert_eq!(projectiles[0].pos, Vec2::new(100.0, 100.0));
        for _ in 0..60 {
            step_projectiles(&mut projectiles, &bounds);
        }
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_inbound_enemy_shot_survives_spawn_outside() {
        let bounds = WorldBounds::new(300.0, 300.0);
        let mut p = Projectile::new(1, Vec2::new(40.0, -10.0), Vec2::Y, 3.0, 4.0, 2.0, Faction::Enemy);
        assert!(p.advance(&bounds));
    }

    #[test]
    fn test_far_outside_culled() {
        let bounds = WorldBounds::new(100.0, 100.0);
        let mut p = Projectile::new(1, Vec2::new(50.0, -500.0), -Vec2::Y, 3.0, 4.0, 2.0, Faction::Enemy);
        assert!(!p.advance(&bounds));
    }

    #[test]
    fn test_pierce_consumption() {
        let mut p = shot(Vec2::ZERO, Vec2::X, 0).with_pierce(1);
        assert!(p.register_hit(1));
        assert_eq!(p.pierce_left, 0);
        assert!(!p.register_hit(2));
    }

    #[test]
    fn test_cooldown_scales_with_fire_rate() {
        assert_eq!(Weapon::Inferno.cooldown_ticks(1.0), 15);
        assert_eq!(Weapon::Inferno.cooldown_ticks(2.0), 7);
        assert_eq!(Weapon::Flame.cooldown_ticks(10.0), 1);
        assert_eq!(Weapon::Orb.cooldown_ticks(0.0), 45);
    }

    #[test]
    fn test_multishot_fans_pellets() {
        let mut state = SimulationContext::new(7, WorldBounds::default());
        state.progression.permanent = PermanentUpgrades {
            multishot: 2,
            bounce: 1,
            pierce: 3,
            ..Default::default()
        };
        let before = state.projectiles.len();
        let fired = fire_player_weapon(&mut state, Vec2::new(100.0, 100.0), Vec2::X);
        assert_eq!(fired, 5);
        let shots = &state.projectiles[before..];
        assert!(shots.iter().all(|p| p.bounces_left == 1 && p.pierce_left == 3));
        // Middle pellet flies straight along the aim
        assert!((shots[2].dir - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_zero_aim_uses_default() {
        let mut state = SimulationContext::new(7, WorldBounds::default());
        fire_player_weapon(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let p = state.projectiles.last().unwrap();
        assert_eq!(p.dir, crate::DEFAULT_AIM);
    }

    proptest! {
        #[test]
        fn prop_counters_never_underflow(
            x in 0.0f32..100.0,
            y in 0.0f32..100.0,
            angle in 0.0f32..std::f32::consts::TAU,
            bounces in 0u32..3,
        ) {
            let bounds = WorldBounds::new(100.0, 100.0);
            let mut p = Projectile::new(
                1,
                Vec2::new(x, y),
                crate::direction_from_angle(angle),
                7.0,
                3.0,
                1.0,
                Faction::Player,
            )
            .with_bounces(bounces);
            for _ in 0..200 {
                let before = p.bounces_left;
                if !p.advance(&bounds) {
                    break;
                }
                prop_assert!(p.bounces_left <= before);
            }
        }
    }
}
