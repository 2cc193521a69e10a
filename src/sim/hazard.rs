//! Lingering area effects
//!
//! Damage zones hurt the faction opposing their owner every tick they
//! overlap. Pull fields nudge the player's position toward their center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{circle_ellipse_overlap, clamp_to_bounds};
use super::combat::{damage_player, on_enemy_killed};
use super::entity::Faction;
use super::state::SimulationContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    DamageZone,
    PullField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub radius: f32,
    pub remaining_ticks: u32,
    /// Damage per tick (zones) or peak pull per tick (fields)
    pub magnitude: f32,
    /// Owner; zones harm the opposing faction
    pub faction: Faction,
}

impl Hazard {
    pub fn damage_zone(
        id: u32,
        pos: Vec2,
        radius: f32,
        ticks: u32,
        damage_per_tick: f32,
        faction: Faction,
    ) -> Self {
        Self {
            id,
            kind: HazardKind::DamageZone,
            pos,
            radius,
            remaining_ticks: ticks,
            magnitude: damage_per_tick,
            faction,
        }
    }

    pub fn pull_field(id: u32, pos: Vec2, radius: f32, ticks: u32, strength: f32) -> Self {
        Self {
            id,
            kind: HazardKind::PullField,
            pos,
            radius,
            remaining_ticks: ticks,
            magnitude: strength,
            faction: Faction::Enemy,
        }
    }

    /// Displacement applied to a point at `target`: toward the center,
    /// `magnitude` at the center falling to zero at the rim
    pub fn pull_on(&self, target: Vec2) -> Vec2 {
        let to_center = self.pos - target;
        let dist = to_center.length();
        if dist >= self.radius || dist < 1e-4 {
            return Vec2::ZERO;
        }
        let strength = self.magnitude * (1.0 - dist / self.radius);
        (to_center / dist) * strength.min(dist)
    }
}

/// Advance every hazard one tick: apply its effect, then count down.
/// A hazard is removed the tick its lifetime reaches zero.
pub fn step_hazards(state: &mut SimulationContext) {
    let mut hazards = std::mem::take(&mut state.hazards);

    for hazard in &mut hazards {
        if hazard.remaining_ticks == 0 {
            continue;
        }
        match hazard.kind {
            HazardKind::DamageZone => apply_zone(state, hazard),
            HazardKind::PullField => {
                let nudge = hazard.pull_on(state.player.pos());
                if nudge != Vec2::ZERO {
                    let body = &mut state.player.body;
                    body.pos = clamp_to_bounds(body.pos + nudge, &state.bounds, body.size);
                }
            }
        }
        hazard.remaining_ticks -= 1;
    }

    hazards.retain(|h| h.remaining_ticks > 0);
    // Hazards spawned by kills this tick were pushed onto the live list
    hazards.append(&mut state.hazards);
    state.hazards = hazards;
}

fn apply_zone(state: &mut SimulationContext, hazard: &Hazard) {
    match hazard.faction.opposing() {
        Faction::Player => {
            let player = &state.player.body;
            if circle_ellipse_overlap(hazard.pos, hazard.radius, player.pos, player.hit_ellipse()) {
                damage_player(state, hazard.magnitude);
            }
        }
        Faction::Enemy => {
            let mut killed = Vec::new();
            for enemy in state.enemies.iter_mut() {
                if !enemy.is_alive() {
                    continue;
                }
                if circle_ellipse_overlap(hazard.pos, hazard.radius, enemy.pos, enemy.hit_ellipse()) {
                    enemy.apply_damage(hazard.magnitude);
                    if !enemy.is_alive() && !enemy.is_boss() {
                        killed.push(enemy.id);
                    }
                }
            }
            for id in killed {
                if let Some(enemy) = state.remove_enemy(id) {
                    on_enemy_killed(state, enemy);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyKind, Entity};
    use crate::sim::state::WorldBounds;

    fn empty_state() -> SimulationContext {
        SimulationContext::new(3, WorldBounds::new(400.0, 400.0))
    }

    #[test]
    fn test_damage_zone_hurts_enemy_over_ticks() {
        let mut state = empty_state();
        let mut enemy = Entity::enemy(50, EnemyKind::DebtSkeleton, Vec2::new(105.0, 100.0), 0.0);
        enemy.hp = 5.0;
        state.enemies.push(enemy);
        state.hazards.push(Hazard::damage_zone(
            60,
            Vec2::new(100.0, 100.0),
            20.0,
            300,
            1.0,
            Faction::Player,
        ));

        for _ in 0..3 {
            step_hazards(&mut state);
        }
        let hp = state.enemy(50).map(|e| e.hp).unwrap();
        assert!(hp < 5.0);
        assert_eq!(hp, 2.0);
    }

    #[test]
    fn test_zone_does_not_hurt_own_faction() {
        let mut state = empty_state();
        let center = state.player.pos();
        state
            .hazards
            .push(Hazard::damage_zone(60, center, 50.0, 10, 5.0, Faction::Player));
        step_hazards(&mut state);
        assert_eq!(state.player.body.hp, state.player.body.max_hp);
    }

    #[test]
    fn test_enemy_zone_hurts_player() {
        let mut state = empty_state();
        let center = state.player.pos();
        state
            .hazards
            .push(Hazard::damage_zone(60, center, 25.0, 300, 2.0, Faction::Enemy));
        step_hazards(&mut state);
        assert_eq!(state.player.body.hp, state.player.body.max_hp - 2.0);
        // Invulnerability blocks the next tick
        step_hazards(&mut state);
        assert_eq!(state.player.body.hp, state.player.body.max_hp - 2.0);
    }

    #[test]
    fn test_hazard_kill_drops_coin() {
        let mut state = empty_state();
        let mut enemy = Entity::enemy(50, EnemyKind::DebtSkeleton, Vec2::new(100.0, 100.0), 0.0);
        enemy.hp = 1.0;
        state.enemies.push(enemy);
        state.hazards.push(Hazard::damage_zone(
            60,
            Vec2::new(100.0, 100.0),
            20.0,
            5,
            3.0,
            Faction::Player,
        ));
        step_hazards(&mut state);
        assert!(state.enemy(50).is_none());
        assert!(!state.pickups.is_empty());
    }

    #[test]
    fn test_lifetime_expires() {
        let mut state = empty_state();
        state.hazards.push(Hazard::damage_zone(
            60,
            Vec2::new(10.0, 10.0),
            5.0,
            2,
            1.0,
            Faction::Player,
        ));
        step_hazards(&mut state);
        assert_eq!(state.hazards[0].remaining_ticks, 1);
        step_hazards(&mut state);
        assert!(state.hazards.is_empty());
    }

    #[test]
    fn test_pull_field_nudges_player_toward_center() {
        let mut state = empty_state();
        let start = state.player.pos();
        let well = start + Vec2::new(50.0, 0.0);
        state.hazards.push(Hazard::pull_field(70, well, 100.0, 10, 3.0));
        step_hazards(&mut state);
        let moved = state.player.pos() - start;
        assert!(moved.x > 0.0);
        assert!((moved.x - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_pull_zero_outside_radius() {
        let field = Hazard::pull_field(1, Vec2::ZERO, 10.0, 5, 3.0);
        assert_eq!(field.pull_on(Vec2::new(20.0, 0.0)), Vec2::ZERO);
        assert_eq!(field.pull_on(Vec2::ZERO), Vec2::ZERO);
    }
}
