//! Balance table
//!
//! Tunable constants consumed by the spawner, the coin timer and the boss
//! director. Every field has a safe default so a partial or missing table
//! still produces a playable run.

use serde::{Deserialize, Serialize};

/// Data-driven balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTable {
    // === Spawner ===
    /// Spawn countdown before difficulty shrinkage (ticks)
    pub spawn_interval_base: u32,
    /// Lower bound on the spawn countdown (ticks)
    pub spawn_interval_min: u32,
    /// Difficulty gained per spawn
    pub difficulty_per_spawn: f32,
    /// Difficulty gained per tick without a spawn
    pub difficulty_per_tick: f32,

    // === Currency pickups ===
    pub coin_timer_base: u32,
    pub coin_timer_min: u32,
    /// Countdown before the first world coin
    pub coin_timer_initial: u32,

    // === Bosses ===
    /// Difficulty milestones, one per scripted boss in order
    pub boss_thresholds: Vec<f32>,
    /// Ticks after a boss death before the next may spawn
    pub post_boss_cooldown: u32,

    // === Economy ===
    pub starting_debt: f64,
    pub auto_repay_per_tick: f64,
}

impl Default for BalanceTable {
    fn default() -> Self {
        Self {
            spawn_interval_base: 120,
            spawn_interval_min: 30,
            difficulty_per_spawn: 1.0,
            difficulty_per_tick: 0.01,

            coin_timer_base: 180,
            coin_timer_min: 90,
            coin_timer_initial: 120,

            boss_thresholds: vec![30.0, 80.0, 140.0],
            post_boss_cooldown: 600,

            starting_debt: 10_000.0,
            auto_repay_per_tick: 0.1,
        }
    }
}

impl BalanceTable {
    /// Parse a balance table, falling back to defaults on malformed input.
    ///
    /// Missing fields take their defaults individually; a document that does
    /// not parse at all is replaced wholesale.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<BalanceTable>(json) {
            Ok(table) => table.sanitized(),
            Err(e) => {
                log::warn!("Balance table unreadable ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        self.spawn_interval_min = self.spawn_interval_min.max(1);
        if self.spawn_interval_base < self.spawn_interval_min {
            self.spawn_interval_base = self.spawn_interval_min;
        }
        self.coin_timer_min = self.coin_timer_min.max(1);
        if self.coin_timer_base < self.coin_timer_min {
            self.coin_timer_base = self.coin_timer_min;
        }
        if !self.difficulty_per_spawn.is_finite() || self.difficulty_per_spawn < 0.0 {
            self.difficulty_per_spawn = 1.0;
        }
        if !self.difficulty_per_tick.is_finite() || self.difficulty_per_tick < 0.0 {
            self.difficulty_per_tick = 0.01;
        }
        self.boss_thresholds.retain(|t| t.is_finite());
        if !self.starting_debt.is_finite() || self.starting_debt < 0.0 {
            self.starting_debt = 10_000.0;
        }
        if !self.auto_repay_per_tick.is_finite() || self.auto_repay_per_tick < 0.0 {
            self.auto_repay_per_tick = 0.0;
        }
        self
    }

    /// Spawn countdown after a spawn at `difficulty`
    pub fn spawn_interval(&self, difficulty: f32) -> u32 {
        countdown_for(self.spawn_interval_base, self.spawn_interval_min, difficulty)
    }

    /// Coin countdown after a coin spawn at `difficulty`
    pub fn coin_interval(&self, difficulty: f32) -> u32 {
        countdown_for(self.coin_timer_base, self.coin_timer_min, difficulty)
    }
}

/// `max(min, base - floor(difficulty))` without underflow
fn countdown_for(base: u32, min: u32, difficulty: f32) -> u32 {
    let shrink = difficulty.max(0.0).floor();
    let remaining = (base as f32 - shrink).max(0.0) as u32;
    remaining.max(min)
}
