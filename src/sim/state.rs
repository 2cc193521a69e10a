//! Simulation context and core run types
//!
//! Everything a run mutates lives in `SimulationContext`, which is created at
//! run start, reset by `restart`, and passed by reference into every system.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossDirector;
use super::buffs::{BuffKind, BuffList};
use super::character::Character;
use super::entity::{Entity, Faction};
use super::events::GameEvent;
use super::hazard::Hazard;
use super::ledger::{EconomyLedger, LoanOffer};
use super::leveling::{LevelState, Pickup};
use super::progression::{PermanentUpgrades, ProgressionStore, StatKey, UpgradeKey};
use super::projectile::{Projectile, Weapon};
use super::spawner::SpawnerState;
use crate::balance::BalanceTable;
use crate::consts::*;

/// Gear loan: run-scoped damage bonus
const GEAR_LOAN_DAMAGE_BONUS: f32 = 0.10;
/// Cursed loan detonation
const CURSED_BLAST_RADIUS: f32 = 120.0;
const CURSED_BLAST_TICKS: u32 = 30;
const CURSED_BLAST_DAMAGE: f32 = 2.0;
const CURSED_SLOW: f32 = -0.25;
const CURSED_SLOW_TICKS: u32 = 300;

/// Rectangular play area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(WORLD_WIDTH, WORLD_HEIGHT)
    }
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `p` lies more than `margin` outside the world
    pub fn is_far_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin || p.y < -margin || p.x > self.width + margin || p.y > self.height + margin
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen by the player (menus, shop, loans)
    Paused,
    /// Frozen until every pending level-up offer is chosen
    UpgradeChoice,
    /// Player died
    GameOver,
    /// Every scripted boss is down
    Victory,
}

impl GamePhase {
    /// Whether the simulation steps in this phase
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// The player avatar: shared entity record plus player-only timers
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Entity,
    pub character: Character,
    pub weapon: Weapon,
    pub shield: f32,
    pub shield_max: f32,
    /// Ticks until the shield starts regenerating
    pub shield_regen_cooldown: u32,
    /// Ticks during which no damage applies
    pub invuln_ticks: u32,
    /// Ticks until the weapon may fire again
    pub fire_cooldown: u32,
    /// Ticks until the next fire-trail patch
    pub trail_timer: u32,
    /// Aim sampled this tick (default aim when input was zero)
    pub aim: Vec2,
}

impl Player {
    pub fn new(id: u32, character: Character, pos: Vec2) -> Self {
        let shield_max = character.shield_max();
        Self {
            body: Entity::player(id, pos, PLAYER_RADIUS, PLAYER_MAX_HP),
            character,
            weapon: character.weapon(),
            shield: shield_max,
            shield_max,
            shield_regen_cooldown: 0,
            invuln_ticks: 0,
            fire_cooldown: 0,
            trail_timer: 0,
            aim: crate::DEFAULT_AIM,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }
}

/// Everything needed to start a run besides the persisted records
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub seed: u64,
    pub character: Character,
    pub balance: BalanceTable,
    pub bounds: WorldBounds,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct SimulationContext {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Unpaused ticks simulated this run
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub bounds: WorldBounds,
    pub balance: BalanceTable,
    pub player: Player,
    /// Regular enemies and bosses (sorted by id)
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub ledger: EconomyLedger,
    pub progression: ProgressionStore,
    pub buffs: BuffList,
    /// Monotonically non-decreasing
    pub difficulty: f32,
    pub spawner: SpawnerState,
    pub director: BossDirector,
    pub leveling: LevelState,
    /// Named events raised since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimulationContext {
    /// A default run with the given seed and world
    pub fn new(seed: u64, bounds: WorldBounds) -> Self {
        let config = RunConfig {
            seed,
            bounds,
            ..Default::default()
        };
        let ledger = EconomyLedger::new(config.balance.starting_debt);
        Self::from_config(config, ledger, PermanentUpgrades::default())
    }

    /// Start a run from config plus the persisted ledger and upgrades
    pub fn from_config(config: RunConfig, ledger: EconomyLedger, permanent: PermanentUpgrades) -> Self {
        let RunConfig {
            seed,
            character,
            balance,
            bounds,
        } = config;
        let balance = balance.sanitized();
        let spawner = SpawnerState::new(&balance);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            bounds,
            balance,
            player: Player::new(1, character, bounds.center()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            ledger,
            progression: ProgressionStore::new(permanent),
            buffs: BuffList::new(),
            difficulty: 0.0,
            spawner,
            director: BossDirector::default(),
            leveling: LevelState::default(),
            events: Vec::new(),
            next_id: 2,
        };
        character.apply_to(&mut state.progression.stats);

        log::info!(
            "Run started: seed={} character={} debt={:.0}",
            seed,
            character.name(),
            state.ledger.debt
        );
        state
    }

    /// Reset run state. The ledger and permanent upgrades carry over.
    pub fn restart(&mut self, seed: u64) {
        let config = RunConfig {
            seed,
            character: self.player.character,
            balance: self.balance.clone(),
            bounds: self.bounds,
        };
        let ledger = self.ledger.clone();
        let permanent = self.progression.permanent;
        *self = Self::from_config(config, ledger, permanent);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform draw in [0, 1) from the run RNG
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Raise a named event for the audio/UI layer
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enemy(&self, id: u32) -> Option<&Entity> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Remove an enemy by id. Removing an absent id is a no-op.
    pub fn remove_enemy(&mut self, id: u32) -> Option<Entity> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    /// Remove a projectile by id. Removing an absent id is a no-op.
    pub fn remove_projectile(&mut self, id: u32) -> bool {
        match self.projectiles.iter().position(|p| p.id == id) {
            Some(idx) => {
                self.projectiles.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Set or clear the player pause. Only a running or paused game toggles.
    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (GamePhase::Playing, true) => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Playing,
            (phase, _) => phase,
        };
    }

    /// Keep playing after the final boss falls
    pub fn continue_after_victory(&mut self) {
        if self.phase == GamePhase::Victory {
            self.phase = GamePhase::Playing;
        }
    }

    /// Take a loan product. Allowed in any phase; the Cursed loan's blast
    /// lands on the next unpaused tick.
    pub fn take_loan(&mut self, offer: LoanOffer) {
        self.ledger.take_offer(offer);
        match offer {
            LoanOffer::Simple => {}
            LoanOffer::Gear => {
                self.progression
                    .apply_bonus(StatKey::Damage, GEAR_LOAN_DAMAGE_BONUS);
            }
            LoanOffer::Cursed => {
                let id = self.next_entity_id();
                self.hazards.push(Hazard::damage_zone(
                    id,
                    self.player.pos(),
                    CURSED_BLAST_RADIUS,
                    CURSED_BLAST_TICKS,
                    CURSED_BLAST_DAMAGE,
                    Faction::Player,
                ));
                self.buffs.add(
                    &mut self.progression.stats,
                    BuffKind::CursedSlow,
                    CURSED_SLOW,
                    CURSED_SLOW_TICKS,
                );
            }
        }
        log::info!(
            "{} taken: gold={:.0} debt={:.0}",
            offer.name(),
            self.ledger.gold,
            self.ledger.debt
        );
        self.emit(GameEvent::LoanTaken { offer });
    }

    /// Spend inferno gems on a permanent upgrade; takes effect immediately
    pub fn buy_upgrade(&mut self, key: UpgradeKey) -> Option<u32> {
        let level = self.progression.permanent.buy(key)?;
        log::info!("Permanent upgrade {} -> level {}", key.as_str(), level);
        Some(level)
    }

    /// Switch the player's weapon
    pub fn select_weapon(&mut self, weapon: Weapon) {
        if self.player.weapon != weapon {
            self.player.weapon = weapon;
            self.player.fire_cooldown = 0;
        }
    }

    /// The boss currently fighting, if any
    pub fn active_boss(&self) -> Option<&Entity> {
        self.director.active_boss.and_then(|id| self.enemy(id))
    }

    /// Keep collections sorted by id for stable iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.hazards.sort_by_key(|h| h.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}
