//! Read-only views for presentation
//!
//! Captured after a tick completes. Renderers and HUDs consume these owned
//! copies and never touch the simulation context.

use glam::Vec2;
use serde::Serialize;

use super::boss::CombatBehavior;
use super::buffs::Buff;
use super::entity::{AnimState, EntityKind, Faction};
use super::hazard::HazardKind;
use super::leveling::{PickupKind, UpgradeOffer};
use super::state::{GamePhase, SimulationContext};

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: f32,
    pub anim: AnimState,
    pub faction: Faction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub faction: Faction,
    pub shockwave: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardView {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub radius: f32,
    pub faction: Faction,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupView {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
}

/// Boss health bar
#[derive(Debug, Clone, Serialize)]
pub struct BossBar {
    pub name: &'static str,
    pub hp: f32,
    pub max_hp: f32,
    /// Shield or absorb window up
    pub blocking: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub hp: f32,
    pub max_hp: f32,
    pub shield: f32,
    pub shield_max: f32,
    pub gold: f64,
    pub debt: f64,
    pub gems: u32,
    pub level: u32,
    pub xp: u32,
    pub next_threshold: u32,
    pub difficulty: f32,
    pub phase: GamePhase,
    pub boss: Option<BossBar>,
    /// Temporary effects with their remaining ticks
    pub buffs: Vec<Buff>,
    /// Oldest offer awaiting a choice
    pub pending_offer: Option<UpgradeOffer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub player: EntityView,
    pub enemies: Vec<EntityView>,
    pub projectiles: Vec<ProjectileView>,
    pub hazards: Vec<HazardView>,
    pub pickups: Vec<PickupView>,
    pub hud: HudSnapshot,
}

impl RenderSnapshot {
    pub fn capture(state: &SimulationContext) -> Self {
        let entity = |e: &super::entity::Entity| EntityView {
            id: e.id,
            kind: e.kind,
            pos: e.pos,
            size: e.size,
            anim: e.anim,
            faction: e.faction,
        };

        let boss = state.active_boss().and_then(|b| {
            let EntityKind::Boss(kind) = b.kind else {
                return None;
            };
            let blocking = b.behavior.as_ref().is_some_and(CombatBehavior::is_blocking);
            Some(BossBar {
                name: kind.name(),
                hp: b.hp.max(0.0),
                max_hp: b.max_hp,
                blocking,
            })
        });

        let player = &state.player;
        Self {
            tick: state.time_ticks,
            player: entity(&player.body),
            enemies: state.enemies.iter().map(entity).collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    pos: p.pos,
                    radius: p.radius,
                    faction: p.faction,
                    shockwave: p.shockwave,
                })
                .collect(),
            hazards: state
                .hazards
                .iter()
                .map(|h| HazardView {
                    id: h.id,
                    kind: h.kind,
                    pos: h.pos,
                    radius: h.radius,
                    faction: h.faction,
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                    radius: p.radius,
                })
                .collect(),
            hud: HudSnapshot {
                hp: player.body.hp.max(0.0),
                max_hp: player.body.max_hp,
                shield: player.shield,
                shield_max: player.shield_max,
                gold: state.ledger.gold,
                debt: state.ledger.debt,
                gems: state.progression.permanent.gems,
                level: state.leveling.level,
                xp: state.leveling.xp,
                next_threshold: state.leveling.next_threshold,
                difficulty: state.difficulty,
                phase: state.phase,
                boss,
                buffs: state.buffs.iter().copied().collect(),
                pending_offer: state.leveling.pending.front().cloned(),
            },
        }
    }
}
