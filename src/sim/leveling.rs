//! Pickups, experience and level-up offers
//!
//! Currency pickups are magnetized toward the player and, once touched, pay
//! into both the gold ledger and the experience counter. Each level gained
//! queues an offer of distinct upgrades with independently rolled rarities;
//! the run stays frozen until every queued offer has been answered.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::buffs::BuffKind;
use super::character::Trait;
use super::collision::circle_ellipse_overlap;
use super::events::GameEvent;
use super::progression::StatKey;
use super::state::{GamePhase, SimulationContext};
use crate::consts::*;

const POTION_CHANCE: f32 = 0.15;
const POTION_TICKS: u32 = 300;
const POTION_MAGNITUDE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Gold and experience
    Coin,
    /// Boss drop, worth more than a coin
    Gem,
    /// Restores health
    Heal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Currency value, or heal amount
    pub value: f32,
}

impl Pickup {
    pub fn coin(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: PickupKind::Coin,
            pos,
            radius: COIN_RADIUS,
            value: COIN_VALUE as f32,
        }
    }

    pub fn gem(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: PickupKind::Gem,
            pos,
            radius: GEM_RADIUS,
            value: GEM_VALUE as f32,
        }
    }

    pub fn heal(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: PickupKind::Heal,
            pos,
            radius: HEAL_PICKUP_RADIUS,
            value: HEAL_AMOUNT,
        }
    }

    pub fn is_currency(&self) -> bool {
        matches!(self.kind, PickupKind::Coin | PickupKind::Gem)
    }
}

/// Per-tick pull toward the player for a pickup `dist` away inside `radius`
pub fn magnet_pull(radius: f32, dist: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    (1.0 + (radius - dist) / 20.0).min(MAGNET_MAX_PULL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Normal,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Normal, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    /// Fractional stat bonus
    pub fn bonus(&self) -> f32 {
        match self {
            Rarity::Normal => 0.25,
            Rarity::Rare => 0.5,
            Rarity::Epic => 1.0,
            Rarity::Legendary => 2.0,
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Normal => 60,
            Rarity::Rare => 25,
            Rarity::Epic => 10,
            Rarity::Legendary => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Normal => "Normal",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Weighted pick for a draw in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        let total: u32 = Self::ALL.iter().map(|r| r.weight()).sum();
        let mut target = roll.clamp(0.0, 1.0) * total as f32;
        for rarity in Self::ALL {
            let w = rarity.weight() as f32;
            if target < w {
                return rarity;
            }
            target -= w;
        }
        Rarity::Legendary
    }
}

/// Level-up pool: display name and the stat it scales
pub const UPGRADE_POOL: [(&str, StatKey); 6] = [
    ("Fleet Feet", StatKey::Speed),
    ("Rapid Fire", StatKey::FireRate),
    ("Hotter Flames", StatKey::Damage),
    ("Bigger Blasts", StatKey::ProjectileSize),
    ("Blazing Hands", StatKey::FireRate),
    ("White Heat", StatKey::Damage),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeChoice {
    /// Index into `UPGRADE_POOL`
    pub pool_index: usize,
    pub stat: StatKey,
    pub rarity: Rarity,
}

impl UpgradeChoice {
    pub fn name(&self) -> &'static str {
        UPGRADE_POOL
            .get(self.pool_index)
            .map(|(name, _)| *name)
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    /// Level that earned this offer
    pub level: u32,
    pub choices: Vec<UpgradeChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    pub xp: u32,
    pub next_threshold: u32,
    /// Offers waiting for a choice, oldest first
    pub pending: VecDeque<UpgradeOffer>,
}

impl Default for LevelState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            next_threshold: FIRST_LEVEL_THRESHOLD,
            pending: VecDeque::new(),
        }
    }
}

/// Threshold after `current`, grown and rounded up
pub fn grow_threshold(current: u32) -> u32 {
    ((current as f32 * LEVEL_THRESHOLD_GROWTH).ceil() as u32).max(current + 1)
}

/// Magnetize, collect and convert pickups for one tick
pub fn step_leveling(state: &mut SimulationContext) {
    let magnet = state.progression.magnet_radius();
    let player_axes = state.player.body.hit_ellipse();
    let player_pos = state.player.pos();

    let mut collected = Vec::new();
    state.pickups.retain_mut(|pickup| {
        if pickup.is_currency() {
            let to = player_pos - pickup.pos;
            let dist = to.length();
            let pull = magnet_pull(magnet, dist);
            if pull > 0.0 && dist > 1e-4 {
                pickup.pos += to / dist * pull.min(dist);
            }
        }
        if circle_ellipse_overlap(pickup.pos, pickup.radius, player_pos, player_axes) {
            collected.push((pickup.kind, pickup.value));
            false
        } else {
            true
        }
    });

    let mut xp = 0;
    for (kind, value) in collected {
        match kind {
            PickupKind::Heal => {
                state.player.body.heal(value);
                state.emit(GameEvent::HealCollected { amount: value });
            }
            PickupKind::Coin | PickupKind::Gem => {
                let value = value.max(0.0) as u32;
                state.ledger.collect(value as f64);
                xp += value;
                state.emit(GameEvent::CoinCollected { value });
                maybe_brew_potion(state);
            }
        }
    }
    gain_xp(state, xp);
}

/// Alchemist trait: currency pickups may grant a temporary potion
fn maybe_brew_potion(state: &mut SimulationContext) {
    if state.player.character.trait_kind() != Trait::Potions {
        return;
    }
    if state.roll() >= POTION_CHANCE {
        return;
    }
    let kind = BuffKind::potion_from_roll(state.roll());
    state
        .buffs
        .add(&mut state.progression.stats, kind, POTION_MAGNITUDE, POTION_TICKS);
    log::debug!("Potion brewed: {:?}", kind);
}

/// Add experience and queue an offer per level gained
pub fn gain_xp(state: &mut SimulationContext, amount: u32) {
    state.leveling.xp += amount;
    while state.leveling.xp >= state.leveling.next_threshold {
        state.leveling.xp -= state.leveling.next_threshold;
        state.leveling.level += 1;
        state.leveling.next_threshold = grow_threshold(state.leveling.next_threshold);

        let level = state.leveling.level;
        let offer = roll_offer(state, level);
        state.leveling.pending.push_back(offer);
        log::info!("Level up: {}", level);
        state.emit(GameEvent::LevelUp { level });
    }
    if !state.leveling.pending.is_empty() && state.phase == GamePhase::Playing {
        state.phase = GamePhase::UpgradeChoice;
    }
}

/// Sample distinct upgrades from the pool, each with its own rarity
fn roll_offer(state: &mut SimulationContext, level: u32) -> UpgradeOffer {
    let mut indices: Vec<usize> = (0..UPGRADE_POOL.len()).collect();
    let count = UPGRADE_CHOICES.min(indices.len());
    let mut choices = Vec::with_capacity(count);
    for i in 0..count {
        let j = state.rng.random_range(i..indices.len());
        indices.swap(i, j);
        let pool_index = indices[i];
        let rarity = Rarity::from_roll(state.roll());
        choices.push(UpgradeChoice {
            pool_index,
            stat: UPGRADE_POOL[pool_index].1,
            rarity,
        });
    }
    UpgradeOffer { level, choices }
}

/// Commit a choice from the oldest pending offer. An out-of-range index or
/// an empty queue is a no-op.
pub fn choose_upgrade(state: &mut SimulationContext, index: usize) -> Option<UpgradeChoice> {
    let choice = state.leveling.pending.front()?.choices.get(index).copied()?;
    state.leveling.pending.pop_front();
    state.progression.apply_bonus(choice.stat, choice.rarity.bonus());

    log::info!("Upgrade chosen: {} ({})", choice.name(), choice.rarity.name());
    state.emit(GameEvent::UpgradeChosen {
        stat: choice.stat,
        rarity: choice.rarity,
    });
    if state.leveling.pending.is_empty() && state.phase == GamePhase::UpgradeChoice {
        state.phase = GamePhase::Playing;
    }
    Some(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::Character;
    use crate::sim::state::{RunConfig, WorldBounds};
    use crate::sim::{EconomyLedger, PermanentUpgrades};

    fn arena() -> SimulationContext {
        SimulationContext::new(8, WorldBounds::default())
    }

    #[test]
    fn test_rarity_from_roll() {
        assert_eq!(Rarity::from_roll(0.0), Rarity::Normal);
        assert_eq!(Rarity::from_roll(0.59), Rarity::Normal);
        assert_eq!(Rarity::from_roll(0.61), Rarity::Rare);
        assert_eq!(Rarity::from_roll(0.9), Rarity::Epic);
        assert_eq!(Rarity::from_roll(0.97), Rarity::Legendary);
        assert_eq!(Rarity::from_roll(1.0), Rarity::Legendary);
    }

    #[test]
    fn test_threshold_growth() {
        assert_eq!(grow_threshold(5), 8);
        assert_eq!(grow_threshold(8), 12);
        assert_eq!(grow_threshold(12), 18);
    }

    #[test]
    fn test_magnet_pull_strength() {
        assert_eq!(magnet_pull(110.0, 200.0), 0.0);
        assert_eq!(magnet_pull(110.0, 100.0), 1.5);
        assert_eq!(magnet_pull(110.0, 0.0), MAGNET_MAX_PULL);
    }

    #[test]
    fn test_coin_pulled_then_collected() {
        let mut state = arena();
        let start = state.player.pos() + Vec2::new(60.0, 0.0);
        state.pickups.push(Pickup::coin(100, start));
        step_leveling(&mut state);
        assert!(state.pickups[0].pos.x < start.x);

        for _ in 0..60 {
            step_leveling(&mut state);
        }
        assert!(state.pickups.is_empty());
        assert_eq!(state.ledger.gold, 1.0);
        assert_eq!(state.leveling.xp, 1);
    }

    #[test]
    fn test_heal_not_magnetized() {
        let mut state = arena();
        state.player.body.hp = 50.0;
        let pos = state.player.pos() + Vec2::new(60.0, 0.0);
        state.pickups.push(Pickup::heal(100, pos));
        step_leveling(&mut state);
        assert_eq!(state.pickups[0].pos, pos);

        state.pickups[0].pos = state.player.pos();
        step_leveling(&mut state);
        assert_eq!(state.player.body.hp, 75.0);
    }

    #[test]
    fn test_multiple_level_ups_queue_offers() {
        let mut state = arena();
        gain_xp(&mut state, 5 + 8 + 1);
        assert_eq!(state.leveling.level, 3);
        assert_eq!(state.leveling.xp, 1);
        assert_eq!(state.leveling.next_threshold, 12);
        assert_eq!(state.leveling.pending.len(), 2);
        assert_eq!(state.phase, GamePhase::UpgradeChoice);

        choose_upgrade(&mut state, 0).unwrap();
        assert_eq!(state.phase, GamePhase::UpgradeChoice);
        choose_upgrade(&mut state, 2).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_offer_has_no_repeats() {
        let mut state = arena();
        for _ in 0..20 {
            let offer = roll_offer(&mut state, 2);
            assert_eq!(offer.choices.len(), UPGRADE_CHOICES);
            let mut seen: Vec<usize> = offer.choices.iter().map(|c| c.pool_index).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), UPGRADE_CHOICES);
        }
    }

    #[test]
    fn test_choice_applies_rarity_bonus() {
        let mut state = arena();
        state.leveling.pending.push_back(UpgradeOffer {
            level: 2,
            choices: vec![UpgradeChoice {
                pool_index: 0,
                stat: StatKey::Speed,
                rarity: Rarity::Epic,
            }],
        });
        state.phase = GamePhase::UpgradeChoice;
        let before = state.progression.stats.speed;
        assert!(choose_upgrade(&mut state, 5).is_none());
        assert_eq!(state.leveling.pending.len(), 1);

        choose_upgrade(&mut state, 0).unwrap();
        assert!((state.progression.stats.speed - before * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_alchemist_may_brew_potions() {
        let config = RunConfig {
            seed: 21,
            character: Character::Fizzle,
            ..Default::default()
        };
        let mut state = SimulationContext::from_config(
            config,
            EconomyLedger::default(),
            PermanentUpgrades::default(),
        );
        let at = state.player.pos();
        for i in 0..200 {
            state.pickups.push(Pickup::coin(1000 + i, at));
            step_leveling(&mut state);
            state.phase = GamePhase::Playing;
            state.leveling.pending.clear();
        }
        assert!(!state.buffs.is_empty());
    }
}
