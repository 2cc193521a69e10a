//! Combat resolution
//!
//! Runs after motion each tick. Player shots are tested against every live
//! enemy, enemy shots and enemy bodies against the player. Every source of
//! player damage funnels through `damage_player` so the shield and the
//! invulnerability window apply uniformly.

use super::boss::{HitOutcome, IncomingHit};
use super::character::Trait;
use super::collision::{circle_ellipse_overlap, ellipses_overlap};
use super::entity::{AnimState, Entity, EntityKind, Faction};
use super::events::GameEvent;
use super::leveling::Pickup;
use super::projectile::Projectile;
use super::state::{GamePhase, SimulationContext};
use crate::consts::{
    CLOSE_RANGE_BONUS, CLOSE_RANGE_RADIUS, HEAL_DROP_CHANCE, PLAYER_INVULN_TICKS,
    SHIELD_REGEN_DELAY,
};

/// Whether a non-boss death drops a heal, for a draw in [0, 1)
#[inline]
pub fn should_drop_heal(roll: f32) -> bool {
    roll < HEAL_DROP_CHANCE
}

/// Resolve every collision for this tick
pub fn resolve(state: &mut SimulationContext) {
    resolve_player_shots(state);
    resolve_enemy_shots(state);
    resolve_contact(state);
}

fn resolve_player_shots(state: &mut SimulationContext) {
    let player_pos = state.player.pos();
    let close_range = state.player.character.trait_kind() == Trait::CloseDamage;

    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut killed = Vec::new();
    let mut blocked = Vec::new();

    projectiles.retain_mut(|p| {
        if p.faction != Faction::Player {
            return true;
        }
        for enemy in state.enemies.iter_mut() {
            if !enemy.is_alive() || p.has_hit(enemy.id) {
                continue;
            }
            if !circle_ellipse_overlap(p.pos, p.radius, enemy.pos, enemy.hit_ellipse()) {
                continue;
            }

            let mut damage = p.damage;
            if close_range && enemy.pos.distance(player_pos) <= CLOSE_RANGE_RADIUS {
                damage *= CLOSE_RANGE_BONUS;
            }
            if strike(enemy, p, damage) == HitOutcome::Blocked {
                blocked.push(enemy.id);
            }
            if !enemy.is_alive() {
                match enemy.behavior.as_mut() {
                    Some(behavior) => behavior.mark_dead(),
                    None => killed.push(enemy.id),
                }
            }

            if !p.register_hit(enemy.id) {
                return false;
            }
        }
        true
    });

    // Shots fired by kills this tick (none today) land after the survivors
    projectiles.append(&mut state.projectiles);
    state.projectiles = projectiles;

    for id in blocked {
        state.emit(GameEvent::BossHitBlocked { id });
    }
    for id in killed {
        if let Some(enemy) = state.remove_enemy(id) {
            on_enemy_killed(state, enemy);
        }
    }
}

/// Apply one projectile hit, letting a boss capability intercept it first
fn strike(enemy: &mut Entity, p: &Projectile, damage: f32) -> HitOutcome {
    let outcome = match enemy.behavior.as_mut() {
        Some(behavior) => behavior.intercept_hit(&IncomingHit {
            damage,
            base_damage: p.base_damage,
            base_speed: p.speed,
        }),
        None => HitOutcome::Damage(damage),
    };
    if let HitOutcome::Damage(amount) = outcome {
        enemy.apply_damage(amount);
        enemy.anim = AnimState::Hurt;
    }
    outcome
}

fn resolve_enemy_shots(state: &mut SimulationContext) {
    let player_id = state.player.body.id;
    let player_pos = state.player.pos();
    let player_axes = state.player.body.hit_ellipse();

    let mut projectiles = std::mem::take(&mut state.projectiles);
    let mut hits = Vec::new();
    projectiles.retain_mut(|p| {
        if p.faction != Faction::Enemy || p.has_hit(player_id) {
            return true;
        }
        if !circle_ellipse_overlap(p.pos, p.radius, player_pos, player_axes) {
            return true;
        }
        hits.push(p.damage);
        p.register_hit(player_id)
    });
    projectiles.append(&mut state.projectiles);
    state.projectiles = projectiles;

    for damage in hits {
        damage_player(state, damage);
    }
}

fn resolve_contact(state: &mut SimulationContext) {
    if state.player.invuln_ticks > 0 {
        return;
    }
    let player = &state.player.body;
    let touching = state
        .enemies
        .iter()
        .filter(|e| e.is_alive() && e.contact_damage > 0.0)
        .find(|e| ellipses_overlap(e.pos, e.hit_ellipse(), player.pos, player.hit_ellipse()))
        .map(|e| e.contact_damage);

    if let Some(damage) = touching {
        damage_player(state, damage);
    }
}

/// Damage the player: shield first, then health. Returns false when the
/// hit was ignored (invulnerable, dead, or non-positive amount).
pub fn damage_player(state: &mut SimulationContext, amount: f32) -> bool {
    let player = &mut state.player;
    if !(amount > 0.0) || player.invuln_ticks > 0 || !player.is_alive() {
        return false;
    }

    let absorbed = amount.min(player.shield);
    if absorbed > 0.0 {
        player.shield -= absorbed;
        player.shield_regen_cooldown = SHIELD_REGEN_DELAY;
    }
    player.body.apply_damage(amount - absorbed);
    player.invuln_ticks = PLAYER_INVULN_TICKS;
    player.body.anim = AnimState::Hurt;
    let alive = player.is_alive();

    state.emit(GameEvent::PlayerHurt {
        amount,
        shield_absorbed: absorbed,
    });
    if !alive {
        on_player_killed(state);
    }
    true
}

fn on_player_killed(state: &mut SimulationContext) {
    state.player.body.anim = AnimState::Death;
    state.phase = GamePhase::GameOver;
    let repaid = state.ledger.repay_all();
    log::info!(
        "Player died at difficulty {:.1}: repaid {:.0}, debt left {:.0}",
        state.difficulty,
        repaid,
        state.ledger.debt
    );
    state.emit(GameEvent::PlayerDied);
}

/// Drops and bookkeeping for a regular enemy that was just removed
pub fn on_enemy_killed(state: &mut SimulationContext, enemy: Entity) {
    let EntityKind::Enemy(kind) = enemy.kind else {
        return;
    };
    let roll = state.roll();
    if should_drop_heal(roll) {
        let id = state.next_entity_id();
        state.pickups.push(Pickup::heal(id, enemy.pos));
    }
    let id = state.next_entity_id();
    state.pickups.push(Pickup::coin(id, enemy.pos));

    log::debug!("{} {} died at {:?}", kind.name(), enemy.id, enemy.pos);
    state.emit(GameEvent::EnemyDied {
        id: enemy.id,
        kind,
        pos: enemy.pos,
    });
}
