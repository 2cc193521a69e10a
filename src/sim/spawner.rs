//! Spawner curve and regular enemy motion
//!
//! One countdown introduces enemies, another drops world coins. Both shrink
//! with difficulty down to their configured floors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::clamp_to_bounds;
use super::entity::{AnimState, EnemyKind, Entity, EntityKind};
use super::events::GameEvent;
use super::leveling::Pickup;
use super::state::{SimulationContext, WorldBounds};
use crate::balance::BalanceTable;
use crate::consts::WORLD_PAD;
use crate::direction_from_angle;

/// Spawns placed on the ring around the center before switching to the full world
const EARLY_SPAWNS: u32 = 5;
const EARLY_RING_MIN: f32 = 120.0;
const EARLY_RING_SPREAD: f32 = 120.0;

const IMP_WOBBLE_AMPLITUDE: f32 = 2.0;
const IMP_WOBBLE_STEP: f32 = 0.1;
const OGRE_CHARGE_RANGE: f32 = 80.0;
const OGRE_CHARGE_MULTIPLIER: f32 = 4.0;
const OGRE_CHARGE_COOLDOWN: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerState {
    /// Ticks until the next enemy (zero spawns this tick)
    pub spawn_timer: u32,
    /// Ticks until the next world coin
    pub coin_timer: u32,
    pub spawned_total: u32,
}

impl SpawnerState {
    pub fn new(balance: &BalanceTable) -> Self {
        Self {
            spawn_timer: 0,
            coin_timer: balance.coin_timer_initial,
            spawned_total: 0,
        }
    }
}

/// Difficulty-gated archetype for a draw in [0, 1)
pub fn pick_enemy_kind(difficulty: f32, roll: f32) -> EnemyKind {
    if roll > 0.8 && difficulty > 20.0 {
        EnemyKind::BailiffOgre
    } else if roll > 0.5 && difficulty > 10.0 {
        EnemyKind::LoanerImp
    } else {
        EnemyKind::DebtSkeleton
    }
}

/// Spawn point for the `spawned`-th enemy from two uniform draws
pub fn spawn_position(bounds: &WorldBounds, spawned: u32, a: f32, b: f32) -> Vec2 {
    if spawned < EARLY_SPAWNS {
        let angle = a * std::f32::consts::TAU;
        let r = EARLY_RING_MIN + b * EARLY_RING_SPREAD;
        clamp_to_bounds(bounds.center() + direction_from_angle(angle) * r, bounds, WORLD_PAD)
    } else {
        Vec2::new(a * bounds.width, b * bounds.height)
    }
}

/// Count down and spawn at most one enemy. Difficulty grows either way.
pub fn maybe_spawn(state: &mut SimulationContext) {
    if state.spawner.spawn_timer > 0 {
        state.spawner.spawn_timer -= 1;
        state.difficulty += state.balance.difficulty_per_tick;
        return;
    }

    let difficulty = state.difficulty;
    let kind = pick_enemy_kind(difficulty, state.roll());
    let (a, b) = (state.roll(), state.roll());
    let pos = spawn_position(&state.bounds, state.spawner.spawned_total, a, b);
    let wobble = state.roll() * std::f32::consts::TAU;

    let id = state.next_entity_id();
    state.enemies.push(Entity::enemy(id, kind, pos, wobble));
    state.spawner.spawned_total += 1;
    state.spawner.spawn_timer = state.balance.spawn_interval(difficulty);
    state.difficulty += state.balance.difficulty_per_spawn;

    log::debug!(
        "Spawned {} {} at ({:.0}, {:.0}), difficulty {:.2}",
        kind.name(),
        id,
        pos.x,
        pos.y,
        state.difficulty
    );
    state.emit(GameEvent::EnemySpawned { id, kind });
}

/// Drop a coin somewhere in the world when the coin timer runs out
pub fn maybe_spawn_coin(state: &mut SimulationContext) {
    if state.spawner.coin_timer > 0 {
        state.spawner.coin_timer -= 1;
        return;
    }
    let raw = Vec2::new(state.roll() * state.bounds.width, state.roll() * state.bounds.height);
    let pos = clamp_to_bounds(raw, &state.bounds, WORLD_PAD);
    let id = state.next_entity_id();
    state.pickups.push(Pickup::coin(id, pos));
    state.spawner.coin_timer = state.balance.coin_interval(state.difficulty);
}

/// Steer every regular enemy toward the player
pub fn step_enemy_motion(state: &mut SimulationContext) {
    let target = state.player.pos();
    let bounds = state.bounds;
    for enemy in state.enemies.iter_mut() {
        let EntityKind::Enemy(kind) = enemy.kind else {
            continue;
        };
        if !enemy.is_alive() {
            continue;
        }
        move_enemy(enemy, kind, target);
        enemy.pos = clamp_to_bounds(enemy.pos, &bounds, 0.0);
    }
}

fn move_enemy(enemy: &mut Entity, kind: EnemyKind, target: Vec2) {
    enemy.anim = AnimState::Walk;
    match kind {
        EnemyKind::DebtSkeleton => enemy.step_toward(target, enemy.speed),
        EnemyKind::LoanerImp => {
            enemy.step_toward(target, enemy.speed);
            enemy.pos.x += enemy.motion.wobble_angle.sin() * IMP_WOBBLE_AMPLITUDE;
            enemy.motion.wobble_angle += IMP_WOBBLE_STEP;
        }
        EnemyKind::BailiffOgre => {
            let charging = enemy.motion.charge_cooldown == 0
                && enemy.pos.distance(target) < OGRE_CHARGE_RANGE;
            if charging {
                enemy.step_toward(target, enemy.speed * OGRE_CHARGE_MULTIPLIER);
                enemy.motion.charge_cooldown = OGRE_CHARGE_COOLDOWN;
                enemy.anim = AnimState::Attack;
            } else {
                enemy.step_toward(target, enemy.speed);
                enemy.motion.charge_cooldown = enemy.motion.charge_cooldown.saturating_sub(1);
            }
        }
    }
}
