//! Goblin Inferno - arena combat simulation core
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (movement, combat, bosses, economy)
//! - `balance`: Data-driven spawn and boss tuning
//! - `persistence`: Key-value storage of the ledger and permanent upgrades
//! - `audio`: Named simulation events mapped to sound cues

pub mod audio;
pub mod balance;
pub mod persistence;
pub mod sim;

pub use balance::BalanceTable;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (all timers count ticks)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default world dimensions
    pub const WORLD_WIDTH: f32 = 1600.0;
    pub const WORLD_HEIGHT: f32 = 1200.0;
    /// Pad kept between clamped pickups/spawns and the world edge
    pub const WORLD_PAD: f32 = 16.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 24.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    /// Ticks of invulnerability after any damage instance
    pub const PLAYER_INVULN_TICKS: u32 = 60;
    /// Ticks after shield damage before regeneration starts
    pub const SHIELD_REGEN_DELAY: u32 = 120;
    pub const SHIELD_REGEN_PER_TICK: f32 = 0.25;

    /// Entity hit ellipse: semi-axes as a fraction of the hit size (taller than wide)
    pub const ELLIPSE_WIDTH_FRACTION: f32 = 0.7;
    pub const ELLIPSE_HEIGHT_FRACTION: f32 = 0.9;

    /// Close-range trait
    pub const CLOSE_RANGE_RADIUS: f32 = 80.0;
    pub const CLOSE_RANGE_BONUS: f32 = 1.25;

    /// Projectiles further than this outside the world are culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 64.0;
    /// Shockwaves expand for this many ticks, then expire
    pub const SHOCKWAVE_TICKS: u32 = 60;
    /// Radians between multishot pellets
    pub const MULTISHOT_SPREAD: f32 = 0.15;

    /// Drops
    pub const HEAL_DROP_CHANCE: f32 = 0.10;
    pub const HEAL_AMOUNT: f32 = 25.0;
    pub const HEAL_PICKUP_RADIUS: f32 = 10.0;
    pub const COIN_RADIUS: f32 = 14.0;
    pub const COIN_VALUE: u32 = 1;
    pub const GEM_RADIUS: f32 = 12.0;
    pub const GEM_VALUE: u32 = 2;

    /// Magnet
    pub const MAGNET_BASE_RADIUS: f32 = 110.0;
    pub const MAGNET_RADIUS_PER_LEVEL: f32 = 20.0;
    pub const MAGNET_MAX_PULL: f32 = 6.0;

    /// Leveling
    pub const FIRST_LEVEL_THRESHOLD: u32 = 5;
    pub const LEVEL_THRESHOLD_GROWTH: f32 = 1.5;
    pub const UPGRADE_CHOICES: usize = 3;

    /// Permanent upgrades cap
    pub const MAX_UPGRADE_LEVEL: u32 = 10;

    /// Boss rewards
    pub const BOSS_GOLD_REWARD: f64 = 250.0;
    pub const BOSS_GEM_DROPS: usize = 10;
    pub const BOSS_GEM_JITTER: f32 = 40.0;
}

/// Aim fallback when no usable direction is supplied (straight up in screen space)
pub const DEFAULT_AIM: Vec2 = Vec2::new(0.0, -1.0);

/// Normalize an aim vector, falling back to `DEFAULT_AIM` for zero/NaN input
#[inline]
pub fn aim_or_default(aim: Vec2) -> Vec2 {
    let dir = aim.normalize_or_zero();
    if dir == Vec2::ZERO { DEFAULT_AIM } else { dir }
}

/// Unit vector at `angle` radians
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate a direction by `angle` radians
#[inline]
pub fn rotate(dir: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(dir)
}
