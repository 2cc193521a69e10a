//! Boss director
//!
//! Each boss carries a `CombatBehavior`: its own ability cooldown, a phase
//! state machine, and a hit interceptor for shield and absorb windows. The
//! director spawns bosses in a fixed order as difficulty crosses the
//! configured thresholds and pays out rewards when one falls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::clamp_to_bounds;
use super::entity::{AnimState, Entity, EntityKind, Faction};
use super::events::GameEvent;
use super::hazard::Hazard;
use super::leveling::Pickup;
use super::projectile::Projectile;
use super::state::{GamePhase, SimulationContext, WorldBounds};
use crate::consts::{BOSS_GEM_DROPS, BOSS_GEM_JITTER, BOSS_GOLD_REWARD, MULTISHOT_SPREAD, WORLD_PAD};
use crate::{aim_or_default, direction_from_angle, rotate};

/// Ticks of telegraph before an ability lands
const WINDUP_TICKS: u32 = 30;
/// Recovery after a one-shot ability
const RECOVERY_TICKS: u32 = 20;
const SHIELD_TICKS: u32 = 300;
const ABSORB_TICKS: u32 = 90;

/// Collector only absorbs below this health fraction
const ABSORB_HP_FRACTION: f32 = 0.6;

/// Reflected counter-shot, derived from the unbuffed incoming values
const REFLECT_DAMAGE_SCALE: f32 = 1.5;
const REFLECT_SPEED_SCALE: f32 = 1.2;
const REFLECT_SIZE: f32 = 6.0;

/// Where bosses enter, measured from the top edge
const BOSS_SPAWN_Y: f32 = 80.0;

/// Scripted bosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    CreditorsChampion,
    InterestDragon,
    DebtCollector,
}

impl BossKind {
    /// Spawn order
    pub const ORDER: [BossKind; 3] = [
        BossKind::CreditorsChampion,
        BossKind::InterestDragon,
        BossKind::DebtCollector,
    ];

    /// Boss at position `index` of the script
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ORDER.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            BossKind::CreditorsChampion => "Creditor's Champion",
            BossKind::InterestDragon => "The Interest Dragon",
            BossKind::DebtCollector => "The Debt Collector",
        }
    }

    pub fn max_hp(&self) -> f32 {
        match self {
            BossKind::CreditorsChampion => 800.0,
            BossKind::InterestDragon => 550.0,
            BossKind::DebtCollector => 700.0,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            BossKind::CreditorsChampion | BossKind::InterestDragon => 0.8,
            BossKind::DebtCollector => 1.0,
        }
    }

    pub fn size(&self) -> f32 {
        36.0
    }

    /// Ticks before the first ability
    pub fn initial_cooldown(&self) -> u32 {
        match self {
            BossKind::CreditorsChampion => 180,
            BossKind::InterestDragon => 90,
            BossKind::DebtCollector => 60,
        }
    }

    /// Ticks between abilities after the first
    pub fn ability_cooldown(&self) -> u32 {
        match self {
            BossKind::CreditorsChampion => 240,
            BossKind::InterestDragon => 120,
            BossKind::DebtCollector => 90,
        }
    }

    /// Weighted ability choice for a draw in [0, 1)
    pub fn pick_ability(&self, roll: f32, hp_fraction: f32) -> BossAbility {
        match self {
            BossKind::CreditorsChampion => {
                if roll < 0.6 {
                    BossAbility::ClubSlam
                } else {
                    BossAbility::DebtShield
                }
            }
            BossKind::InterestDragon => {
                if roll < 0.65 {
                    BossAbility::FireballVolley
                } else {
                    BossAbility::EmberField
                }
            }
            BossKind::DebtCollector if hp_fraction < ABSORB_HP_FRACTION => {
                if roll < 0.35 {
                    BossAbility::InterestAbsorb
                } else if roll < 0.7 {
                    BossAbility::AimedShot
                } else {
                    BossAbility::CollectionWell
                }
            }
            BossKind::DebtCollector => {
                if roll < 0.6 {
                    BossAbility::AimedShot
                } else {
                    BossAbility::CollectionWell
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAbility {
    /// Shockwave plus a ring of fire patches
    ClubSlam,
    /// Reflect every hit for a while
    DebtShield,
    /// Fireballs rain across the world plus aimed shots
    FireballVolley,
    /// Fire patches around the player
    EmberField,
    AimedShot,
    /// Negate hits and bank them as healing
    InterestAbsorb,
    /// Pull-field at the player's position
    CollectionWell,
}

/// Boss state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossPhase {
    Approach,
    Windup { ability: BossAbility, ticks: u32 },
    Active { ability: BossAbility, ticks: u32 },
    /// Reflecting hits back as counter-shots
    Shielded { ticks: u32 },
    /// Negating hits; `banked` heals the boss when the window closes
    Absorbing { ticks: u32, banked: f32 },
    Dead,
}

/// What the state machine wants the director to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossStep {
    Idle,
    /// Cooldown elapsed; roll an ability
    ReadyForAbility,
    /// Windup finished; apply the ability's effects
    Unleash(BossAbility),
    /// Absorb window closed with this much banked damage
    AbsorbEnded { banked: f32 },
}

/// A hit arriving at a boss
#[derive(Debug, Clone, Copy)]
pub struct IncomingHit {
    /// Damage after every multiplier
    pub damage: f32,
    /// Damage before player stat multipliers
    pub base_damage: f32,
    /// Projectile speed (never scaled by stats)
    pub base_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Subtract this much health
    Damage(f32),
    /// Hit negated (reflected or absorbed)
    Blocked,
}

/// Counter-shot waiting to be fired at the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflectedShot {
    pub damage: f32,
    pub speed: f32,
    pub radius: f32,
}

/// Boss capability attached to an `Entity`
#[derive(Debug, Clone)]
pub struct CombatBehavior {
    pub kind: BossKind,
    pub phase: BossPhase,
    /// Ticks until the next ability roll (counts only while approaching)
    pub ability_cooldown: u32,
    pub pending_reflections: Vec<ReflectedShot>,
}

impl CombatBehavior {
    pub fn new(kind: BossKind) -> Self {
        Self {
            kind,
            phase: BossPhase::Approach,
            ability_cooldown: kind.initial_cooldown(),
            pending_reflections: Vec::new(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.phase, BossPhase::Shielded { .. } | BossPhase::Absorbing { .. })
    }

    /// Intercept a hit before health is touched
    pub fn intercept_hit(&mut self, hit: &IncomingHit) -> HitOutcome {
        match &mut self.phase {
            BossPhase::Shielded { .. } => {
                self.pending_reflections.push(ReflectedShot {
                    damage: hit.base_damage * REFLECT_DAMAGE_SCALE,
                    speed: hit.base_speed * REFLECT_SPEED_SCALE,
                    radius: REFLECT_SIZE,
                });
                HitOutcome::Blocked
            }
            BossPhase::Absorbing { banked, .. } => {
                *banked += hit.base_damage;
                HitOutcome::Blocked
            }
            BossPhase::Dead => HitOutcome::Blocked,
            _ => HitOutcome::Damage(hit.damage),
        }
    }

    pub fn begin_windup(&mut self, ability: BossAbility) {
        self.phase = BossPhase::Windup {
            ability,
            ticks: WINDUP_TICKS,
        };
    }

    pub fn mark_dead(&mut self) {
        self.phase = BossPhase::Dead;
        self.pending_reflections.clear();
    }

    /// Count the current phase down one tick
    pub fn advance(&mut self) -> BossStep {
        match self.phase {
            BossPhase::Approach => {
                self.ability_cooldown = self.ability_cooldown.saturating_sub(1);
                if self.ability_cooldown == 0 {
                    self.ability_cooldown = self.kind.ability_cooldown();
                    BossStep::ReadyForAbility
                } else {
                    BossStep::Idle
                }
            }
            BossPhase::Windup { ability, ticks } => {
                if ticks > 1 {
                    self.phase = BossPhase::Windup {
                        ability,
                        ticks: ticks - 1,
                    };
                    return BossStep::Idle;
                }
                self.phase = match ability {
                    BossAbility::DebtShield => BossPhase::Shielded {
                        ticks: SHIELD_TICKS,
                    },
                    BossAbility::InterestAbsorb => BossPhase::Absorbing {
                        ticks: ABSORB_TICKS,
                        banked: 0.0,
                    },
                    _ => BossPhase::Active {
                        ability,
                        ticks: RECOVERY_TICKS,
                    },
                };
                BossStep::Unleash(ability)
            }
            BossPhase::Active { ability, ticks } => {
                self.phase = if ticks > 1 {
                    BossPhase::Active {
                        ability,
                        ticks: ticks - 1,
                    }
                } else {
                    BossPhase::Approach
                };
                BossStep::Idle
            }
            BossPhase::Shielded { ticks } => {
                self.phase = if ticks > 1 {
                    BossPhase::Shielded { ticks: ticks - 1 }
                } else {
                    BossPhase::Approach
                };
                BossStep::Idle
            }
            BossPhase::Absorbing { ticks, banked } => {
                if ticks > 1 {
                    self.phase = BossPhase::Absorbing {
                        ticks: ticks - 1,
                        banked,
                    };
                    BossStep::Idle
                } else {
                    self.phase = BossPhase::Approach;
                    BossStep::AbsorbEnded { banked }
                }
            }
            BossPhase::Dead => BossStep::Idle,
        }
    }
}

/// Script progress across the run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BossDirector {
    /// Index of the next boss to spawn
    pub next_index: usize,
    pub active_boss: Option<u32>,
    /// Ticks before another boss may spawn
    pub cooldown: u32,
    pub defeated: u32,
    pub all_defeated: bool,
}

/// Run the boss script for one tick
pub fn direct_bosses(state: &mut SimulationContext) {
    match state.director.active_boss {
        Some(id) => {
            let dead = state.enemy(id).map(|b| !b.is_alive());
            match dead {
                Some(true) => defeat_boss(state, id),
                Some(false) => step_boss(state, id),
                // Boss vanished without the reward pipeline
                None => state.director.active_boss = None,
            }
        }
        None => {
            if state.director.cooldown > 0 {
                state.director.cooldown -= 1;
            } else {
                maybe_spawn_boss(state);
            }
        }
    }
}

fn scripted_boss_count(state: &SimulationContext) -> usize {
    state.balance.boss_thresholds.len().min(BossKind::ORDER.len())
}

fn maybe_spawn_boss(state: &mut SimulationContext) {
    let index = state.director.next_index;
    if index >= scripted_boss_count(state) {
        return;
    }
    let Some(threshold) = state.balance.boss_thresholds.get(index).copied() else {
        return;
    };
    if state.difficulty < threshold {
        return;
    }
    let Some(kind) = BossKind::from_index(index) else {
        return;
    };

    let id = state.next_entity_id();
    let pos = Vec2::new(state.bounds.width / 2.0, BOSS_SPAWN_Y.min(state.bounds.height));
    state.enemies.push(Entity::boss(id, kind, pos));
    state.director.active_boss = Some(id);

    log::info!(
        "Boss spawned: {} (difficulty {:.1} >= {:.1})",
        kind.name(),
        state.difficulty,
        threshold
    );
    state.emit(GameEvent::BossSpawned { id, kind });
}

fn defeat_boss(state: &mut SimulationContext, id: u32) {
    state.director.active_boss = None;
    let Some(boss) = state.remove_enemy(id) else {
        return;
    };
    let EntityKind::Boss(kind) = boss.kind else {
        return;
    };

    state.ledger.collect(BOSS_GOLD_REWARD);
    state.progression.permanent.gems += 1;

    for _ in 0..BOSS_GEM_DROPS {
        let jitter = Vec2::new(state.roll() - 0.5, state.roll() - 0.5) * (BOSS_GEM_JITTER * 2.0);
        let pos = clamp_to_bounds(boss.pos + jitter, &state.bounds, WORLD_PAD);
        let gem_id = state.next_entity_id();
        state.pickups.push(Pickup::gem(gem_id, pos));
    }

    state.director.next_index += 1;
    state.director.defeated += 1;
    state.director.cooldown = state.balance.post_boss_cooldown;

    log::info!(
        "Boss defeated: {} (gold {:.0}, gems {})",
        kind.name(),
        state.ledger.gold,
        state.progression.permanent.gems
    );
    state.emit(GameEvent::BossDefeated { id, kind });

    if state.director.next_index >= scripted_boss_count(state) {
        state.director.all_defeated = true;
        state.phase = GamePhase::Victory;
        log::info!("All bosses defeated");
        state.emit(GameEvent::AllBossesDefeated);
    }
}

fn step_boss(state: &mut SimulationContext, id: u32) {
    let player_pos = state.player.pos();
    let bounds = state.bounds;

    let Some(boss) = state.enemy_mut(id) else {
        return;
    };
    let Some(mut behavior) = boss.behavior.take() else {
        return;
    };
    move_boss(boss, &behavior, player_pos, &bounds);
    let pos = boss.pos;
    let hp_fraction = boss.hp / boss.max_hp.max(1.0);

    let mut heal = 0.0;
    match behavior.advance() {
        BossStep::Idle => {}
        BossStep::ReadyForAbility => {
            let roll = state.roll();
            let ability = behavior.kind.pick_ability(roll, hp_fraction);
            log::debug!("{} winds up {:?}", behavior.kind.name(), ability);
            behavior.begin_windup(ability);
        }
        BossStep::Unleash(ability) => {
            unleash(state, pos, player_pos, ability);
            state.emit(GameEvent::BossAbility { id, ability });
        }
        BossStep::AbsorbEnded { banked } => heal = banked,
    }

    for shot in std::mem::take(&mut behavior.pending_reflections) {
        let shot_id = state.next_entity_id();
        let dir = aim_or_default(player_pos - pos);
        state.projectiles.push(Projectile::new(
            shot_id,
            pos,
            dir,
            shot.speed,
            shot.radius,
            shot.damage,
            Faction::Enemy,
        ));
    }

    if let Some(boss) = state.enemy_mut(id) {
        boss.anim = match behavior.phase {
            BossPhase::Approach => AnimState::Walk,
            BossPhase::Shielded { .. } | BossPhase::Absorbing { .. } => AnimState::Idle,
            BossPhase::Dead => AnimState::Death,
            _ => AnimState::Attack,
        };
        boss.heal(heal);
        boss.behavior = Some(behavior);
    }
}

fn move_boss(boss: &mut Entity, behavior: &CombatBehavior, player: Vec2, bounds: &WorldBounds) {
    let speed = boss.speed;
    match behavior.kind {
        BossKind::CreditorsChampion => {
            // Plants its feet for abilities
            if behavior.phase == BossPhase::Approach && boss.pos.distance(player) > 50.0 {
                boss.step_toward(player, speed);
            } else {
                boss.vel = Vec2::ZERO;
            }
        }
        BossKind::InterestDragon => {
            let dx = player.x - boss.pos.x;
            let mut step = Vec2::new(dx.signum() * speed.min(dx.abs()), 0.0);
            if boss.pos.y > bounds.height * 0.25 {
                step.y = -speed;
            }
            boss.pos += step;
            boss.vel = step;
        }
        BossKind::DebtCollector => {
            let to = player - boss.pos;
            let dist = to.length();
            if dist > 210.0 {
                boss.step_toward(player, speed);
            } else if dist < 190.0 && dist > 1e-4 {
                let away = -to / dist * speed;
                boss.pos += away;
                boss.vel = away;
            } else {
                boss.vel = Vec2::ZERO;
            }
        }
    }
    boss.pos = clamp_to_bounds(boss.pos, bounds, boss.size * 0.5);
}

fn enemy_shot(state: &mut SimulationContext, pos: Vec2, dir: Vec2, damage: f32, speed: f32, radius: f32) {
    let id = state.next_entity_id();
    state
        .projectiles
        .push(Projectile::new(id, pos, dir, speed, radius, damage, Faction::Enemy));
}

fn fire_patch(state: &mut SimulationContext, pos: Vec2, ticks: u32) {
    let id = state.next_entity_id();
    let pos = clamp_to_bounds(pos, &state.bounds, 0.0);
    state
        .hazards
        .push(Hazard::damage_zone(id, pos, 25.0, ticks, 2.0, Faction::Enemy));
}

/// Apply an ability's one-shot effects
fn unleash(state: &mut SimulationContext, pos: Vec2, player: Vec2, ability: BossAbility) {
    let aim = aim_or_default(player - pos);
    match ability {
        BossAbility::ClubSlam => {
            let id = state.next_entity_id();
            state.projectiles.push(
                Projectile::new(id, pos, aim, 4.0, 20.0, 30.0, Faction::Enemy).as_shockwave(),
            );
            for i in 0..5 {
                let angle = i as f32 / 5.0 * std::f32::consts::TAU;
                fire_patch(state, pos + direction_from_angle(angle) * 60.0, 300);
            }
        }
        BossAbility::FireballVolley => {
            for _ in 0..8 {
                let x = state.roll() * state.bounds.width;
                enemy_shot(state, Vec2::new(x, -10.0), Vec2::Y, 2.0, 3.0, 4.0);
            }
            for i in -1..=1 {
                let dir = rotate(aim, i as f32 * MULTISHOT_SPREAD);
                enemy_shot(state, pos, dir, 3.0, 4.0, 5.0);
            }
        }
        BossAbility::EmberField => {
            let offset = state.roll() * std::f32::consts::TAU;
            for i in 0..3 {
                let angle = offset + i as f32 / 3.0 * std::f32::consts::TAU;
                fire_patch(state, player + direction_from_angle(angle) * 50.0, 240);
            }
        }
        BossAbility::AimedShot => enemy_shot(state, pos, aim, 3.0, 5.0, 5.0),
        BossAbility::CollectionWell => {
            let id = state.next_entity_id();
            state
                .hazards
                .push(Hazard::pull_field(id, player, 140.0, 180, 2.5));
        }
        // Phase change already made by the state machine
        BossAbility::DebtShield | BossAbility::InterestAbsorb => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityVariant;

    fn state_at(difficulty: f32) -> SimulationContext {
        let mut state = SimulationContext::new(11, WorldBounds::default());
        state.difficulty = difficulty;
        state
    }

    fn hit(damage: f32, base_damage: f32) -> IncomingHit {
        IncomingHit {
            damage,
            base_damage,
            base_speed: 6.0,
        }
    }

    #[test]
    fn test_boss_spawns_past_threshold() {
        let mut state = state_at(100.0);
        assert_eq!(state.balance.boss_thresholds, vec![30.0, 80.0, 140.0]);
        direct_bosses(&mut state);

        let boss = state.enemies.last().unwrap();
        assert_eq!(boss.kind.variant(), EntityVariant::Boss);
        assert_eq!(state.director.active_boss, Some(boss.id));
        assert_eq!(boss.pos, Vec2::new(800.0, 80.0));
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::BossSpawned {
                kind: BossKind::CreditorsChampion,
                ..
            }]
        ));
    }

    #[test]
    fn test_no_spawn_below_threshold_or_with_active_boss() {
        let mut state = state_at(10.0);
        direct_bosses(&mut state);
        assert!(state.enemies.is_empty());

        state.difficulty = 200.0;
        direct_bosses(&mut state);
        direct_bosses(&mut state);
        assert_eq!(state.enemies.iter().filter(|e| e.is_boss()).count(), 1);
    }

    #[test]
    fn test_empty_thresholds_means_no_bosses() {
        let mut state = state_at(1000.0);
        state.balance.boss_thresholds.clear();
        direct_bosses(&mut state);
        assert!(state.enemies.is_empty());
        assert!(!state.director.all_defeated);
    }

    #[test]
    fn test_shielded_boss_reflects_from_base_values() {
        let mut behavior = CombatBehavior::new(BossKind::CreditorsChampion);
        behavior.phase = BossPhase::Shielded { ticks: 100 };

        // A player with heavy multipliers: 3x damage on a base-2 shot
        let outcome = behavior.intercept_hit(&hit(6.0, 2.0));
        assert_eq!(outcome, HitOutcome::Blocked);
        let shot = behavior.pending_reflections[0];
        assert_eq!(shot.damage, 3.0);
        assert_eq!(shot.radius, REFLECT_SIZE);
        assert!((shot.speed - 7.2).abs() < 1e-5);
    }

    #[test]
    fn test_shielded_boss_takes_no_damage_in_combat() {
        let mut state = state_at(100.0);
        direct_bosses(&mut state);
        let id = state.director.active_boss.unwrap();
        let boss = state.enemy_mut(id).unwrap();
        if let Some(b) = boss.behavior.as_mut() {
            b.phase = BossPhase::Shielded { ticks: 100 };
        }
        let hp_before = boss.hp;
        let pos = boss.pos;
        // Keep the player far away so no close-range bonus applies
        state.player.body.pos = Vec2::new(100.0, 1100.0);
        state.progression.stats.projectile_size = 3.0;

        let shot_id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::new(shot_id, pos, Vec2::Y, 6.0, 15.0, 6.0, Faction::Player).with_base_damage(2.0));
        crate::sim::combat::resolve(&mut state);

        let boss = state.enemy(id).unwrap();
        assert_eq!(boss.hp, hp_before);

        direct_bosses(&mut state);
        let reflected = state
            .projectiles
            .iter()
            .find(|p| p.faction == Faction::Enemy)
            .unwrap();
        assert_eq!(reflected.radius, REFLECT_SIZE);
        assert_eq!(reflected.damage, 3.0);
    }

    #[test]
    fn test_absorb_window_heals_banked_damage() {
        let mut behavior = CombatBehavior::new(BossKind::DebtCollector);
        behavior.phase = BossPhase::Absorbing { ticks: 2, banked: 0.0 };
        assert_eq!(behavior.intercept_hit(&hit(9.0, 3.0)), HitOutcome::Blocked);
        assert_eq!(behavior.intercept_hit(&hit(9.0, 3.0)), HitOutcome::Blocked);
        assert!(behavior.pending_reflections.is_empty());

        assert_eq!(behavior.advance(), BossStep::Idle);
        assert_eq!(behavior.advance(), BossStep::AbsorbEnded { banked: 6.0 });
        assert_eq!(behavior.phase, BossPhase::Approach);
        assert_eq!(behavior.intercept_hit(&hit(9.0, 3.0)), HitOutcome::Damage(9.0));
    }

    #[test]
    fn test_windup_leads_to_shield() {
        let mut behavior = CombatBehavior::new(BossKind::CreditorsChampion);
        behavior.begin_windup(BossAbility::DebtShield);
        for _ in 0..WINDUP_TICKS - 1 {
            assert_eq!(behavior.advance(), BossStep::Idle);
        }
        assert_eq!(behavior.advance(), BossStep::Unleash(BossAbility::DebtShield));
        assert!(behavior.is_blocking());
        for _ in 0..SHIELD_TICKS {
            behavior.advance();
        }
        assert_eq!(behavior.phase, BossPhase::Approach);
    }

    #[test]
    fn test_cooldown_is_per_instance() {
        let mut a = CombatBehavior::new(BossKind::InterestDragon);
        let b = CombatBehavior::new(BossKind::InterestDragon);
        for _ in 0..10 {
            a.advance();
        }
        assert_eq!(a.ability_cooldown, 80);
        assert_eq!(b.ability_cooldown, 90);
    }

    #[test]
    fn test_pick_ability_respects_health_gate() {
        let collector = BossKind::DebtCollector;
        assert_ne!(collector.pick_ability(0.1, 1.0), BossAbility::InterestAbsorb);
        assert_eq!(collector.pick_ability(0.1, 0.5), BossAbility::InterestAbsorb);
        assert_eq!(
            BossKind::CreditorsChampion.pick_ability(0.9, 1.0),
            BossAbility::DebtShield
        );
    }

    #[test]
    fn test_club_slam_spawns_shockwave_and_ring() {
        let mut state = state_at(0.0);
        let pos = Vec2::new(400.0, 400.0);
        unleash(&mut state, pos, Vec2::new(400.0, 600.0), BossAbility::ClubSlam);
        assert_eq!(state.projectiles.iter().filter(|p| p.shockwave).count(), 1);
        assert_eq!(state.hazards.len(), 5);
        for h in &state.hazards {
            assert!((h.pos.distance(pos) - 60.0).abs() < 1e-3);
            assert_eq!(h.faction, Faction::Enemy);
        }
    }

    #[test]
    fn test_volley_rains_and_aims() {
        let mut state = state_at(0.0);
        unleash(
            &mut state,
            Vec2::new(800.0, 80.0),
            Vec2::new(800.0, 600.0),
            BossAbility::FireballVolley,
        );
        assert_eq!(state.projectiles.len(), 11);
        assert_eq!(state.projectiles.iter().filter(|p| p.pos.y == -10.0).count(), 8);
    }

    #[test]
    fn test_defeat_pays_out_and_advances() {
        let mut state = state_at(100.0);
        direct_bosses(&mut state);
        let id = state.director.active_boss.unwrap();
        let boss_pos = state.enemy(id).unwrap().pos;
        state.enemy_mut(id).unwrap().hp = 0.0;
        let gold = state.ledger.gold;

        direct_bosses(&mut state);
        assert!(state.enemy(id).is_none());
        assert_eq!(state.ledger.gold, gold + BOSS_GOLD_REWARD);
        assert_eq!(state.progression.permanent.gems, 1);
        assert_eq!(state.pickups.len(), BOSS_GEM_DROPS);
        for gem in &state.pickups {
            assert!(gem.pos.x >= WORLD_PAD && gem.pos.y >= WORLD_PAD);
            assert!((gem.pos - boss_pos).abs().max_element() <= BOSS_GEM_JITTER + 1e-3);
        }
        assert_eq!(state.director.next_index, 1);
        assert_eq!(state.director.cooldown, 600);

        // Cooldown blocks the next boss even though difficulty allows it
        direct_bosses(&mut state);
        assert!(state.director.active_boss.is_none());
    }

    #[test]
    fn test_last_boss_ends_in_victory() {
        let mut state = state_at(500.0);
        for _ in 0..3 {
            state.director.cooldown = 0;
            direct_bosses(&mut state);
            let id = state.director.active_boss.unwrap();
            state.enemy_mut(id).unwrap().hp = -5.0;
            direct_bosses(&mut state);
        }
        assert!(state.director.all_defeated);
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::AllBossesDefeated)));
    }

    #[test]
    fn test_dragon_keeps_top_quarter() {
        let mut boss = Entity::boss(1, BossKind::InterestDragon, Vec2::new(100.0, 800.0));
        let behavior = CombatBehavior::new(BossKind::InterestDragon);
        let bounds = WorldBounds::default();
        move_boss(&mut boss, &behavior, Vec2::new(500.0, 900.0), &bounds);
        assert!(boss.pos.x > 100.0);
        assert!(boss.pos.y < 800.0);
    }
}
