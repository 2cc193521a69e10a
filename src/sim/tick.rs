//! Fixed-order simulation tick
//!
//! One call advances the run by one tick. Systems run in a fixed order:
//! buffs, player, spawner, enemy motion, projectile motion, hazards, combat,
//! leveling, bosses, economy. Motion precedes collision, and collision
//! precedes currency counting.

use glam::Vec2;

use super::boss::direct_bosses;
use super::character::Trait;
use super::collision::clamp_to_bounds;
use super::combat::resolve;
use super::entity::{AnimState, Faction};
use super::hazard::{Hazard, step_hazards};
use super::leveling::step_leveling;
use super::progression::StatKey;
use super::projectile::{Weapon, fire_player_weapon, step_projectiles};
use super::spawner::{maybe_spawn, maybe_spawn_coin, step_enemy_motion};
use super::state::{GamePhase, SimulationContext};
use crate::aim_or_default;
use crate::consts::SHIELD_REGEN_PER_TICK;

const TRAIL_RADIUS: f32 = 16.0;
const TRAIL_TICKS: u32 = 90;
const TRAIL_DAMAGE: f32 = 0.4;
const TRAIL_BASE_INTERVAL: f32 = 18.0;
const TRAIL_MIN_INTERVAL: u32 = 6;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; longer than one is normalized
    pub movement: Vec2,
    /// Aim direction; zero falls back to the default aim
    pub aim: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Switch weapon
    pub weapon: Option<Weapon>,
}

/// Advance the run by one tick
pub fn tick(state: &mut SimulationContext, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.set_paused(true);
                return;
            }
            GamePhase::Paused => state.set_paused(false),
            _ => {}
        }
    }

    if !state.phase.is_running() {
        return;
    }

    if let Some(weapon) = input.weapon {
        state.select_weapon(weapon);
    }

    state.buffs.tick(&mut state.progression.stats);
    step_player(state, input);

    maybe_spawn(state);
    maybe_spawn_coin(state);
    step_enemy_motion(state);

    step_projectiles(&mut state.projectiles, &state.bounds);
    step_hazards(state);
    resolve(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    step_leveling(state);
    direct_bosses(state);

    let repay = state.balance.auto_repay_per_tick;
    state.ledger.repay(repay);

    state.time_ticks += 1;
    state.normalize_order();
}

/// Move, regenerate, count down timers and fire
fn step_player(state: &mut SimulationContext, input: &TickInput) {
    let speed = state.player.character.base_speed() * state.progression.stats.get(StatKey::Speed);
    let intent = if input.movement.length_squared() > 1.0 {
        input.movement.normalize_or_zero()
    } else {
        input.movement
    };
    let moving = intent != Vec2::ZERO && intent.is_finite();

    let player = &mut state.player;
    if moving {
        let body = &mut player.body;
        let target = body.pos + intent * speed;
        let clamped = clamp_to_bounds(target, &state.bounds, body.size);
        body.vel = clamped - body.pos;
        body.pos = clamped;
    } else {
        player.body.vel = Vec2::ZERO;
    }

    if player.shield < player.shield_max {
        if player.shield_regen_cooldown > 0 {
            player.shield_regen_cooldown -= 1;
        } else {
            player.shield = (player.shield + SHIELD_REGEN_PER_TICK).min(player.shield_max);
        }
    }

    player.invuln_ticks = player.invuln_ticks.saturating_sub(1);
    player.body.anim = if player.invuln_ticks > 0 {
        AnimState::Hurt
    } else if moving {
        AnimState::Walk
    } else {
        AnimState::Idle
    };

    player.aim = aim_or_default(input.aim);
    let fire_rate = state.progression.stats.get(StatKey::FireRate);
    if player.fire_cooldown > 0 {
        player.fire_cooldown -= 1;
    }
    if player.fire_cooldown == 0 {
        player.fire_cooldown = player.weapon.cooldown_ticks(fire_rate);
        let (origin, aim) = (player.body.pos, player.aim);
        fire_player_weapon(state, origin, aim);
    }

    if state.player.character.trait_kind() == Trait::FireTrail {
        step_fire_trail(state, moving, fire_rate);
    }
}

/// Arsonist trait: drop a burning patch every few ticks while moving
fn step_fire_trail(state: &mut SimulationContext, moving: bool, fire_rate: f32) {
    let player = &mut state.player;
    player.trail_timer = player.trail_timer.saturating_sub(1);
    if !moving || player.trail_timer > 0 {
        return;
    }
    let rate = if fire_rate > 0.0 { fire_rate } else { 1.0 };
    player.trail_timer = ((TRAIL_BASE_INTERVAL / rate).floor() as u32).max(TRAIL_MIN_INTERVAL);
    let pos = player.body.pos;

    let id = state.next_entity_id();
    state.hazards.push(Hazard::damage_zone(
        id,
        pos,
        TRAIL_RADIUS,
        TRAIL_TICKS,
        TRAIL_DAMAGE,
        Faction::Player,
    ));
}
