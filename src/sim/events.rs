//! Named simulation events
//!
//! The core never calls into audio or UI. It pushes these onto the context
//! and the outer layer drains them after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::{BossAbility, BossKind};
use super::entity::EnemyKind;
use super::ledger::LoanOffer;
use super::leveling::Rarity;
use super::progression::StatKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind },
    EnemyDied { id: u32, kind: EnemyKind, pos: Vec2 },
    PlayerHurt { amount: f32, shield_absorbed: f32 },
    PlayerDied,
    CoinCollected { value: u32 },
    HealCollected { amount: f32 },
    BossSpawned { id: u32, kind: BossKind },
    BossAbility { id: u32, ability: BossAbility },
    /// A hit was negated by a boss shield or absorb window
    BossHitBlocked { id: u32 },
    BossDefeated { id: u32, kind: BossKind },
    AllBossesDefeated,
    LevelUp { level: u32 },
    UpgradeChosen { stat: StatKey, rarity: Rarity },
    LoanTaken { offer: LoanOffer },
}

impl GameEvent {
    /// Stable snake_case name for external subscribers
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::EnemySpawned { .. } => "enemy_spawned",
            GameEvent::EnemyDied { .. } => "enemy_died",
            GameEvent::PlayerHurt { .. } => "player_hurt",
            GameEvent::PlayerDied => "player_died",
            GameEvent::CoinCollected { .. } => "coin_collected",
            GameEvent::HealCollected { .. } => "heal_collected",
            GameEvent::BossSpawned { .. } => "boss_spawned",
            GameEvent::BossAbility { .. } => "boss_ability",
            GameEvent::BossHitBlocked { .. } => "boss_hit_blocked",
            GameEvent::BossDefeated { .. } => "boss_defeated",
            GameEvent::AllBossesDefeated => "all_bosses_defeated",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::UpgradeChosen { .. } => "upgrade_chosen",
            GameEvent::LoanTaken { .. } => "loan_taken",
        }
    }
}
