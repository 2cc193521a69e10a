//! Arena simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick, integer countdowns only
//! - Seeded RNG owned by the context
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod buffs;
pub mod character;
pub mod collision;
pub mod combat;
pub mod entity;
pub mod events;
pub mod hazard;
pub mod ledger;
pub mod leveling;
pub mod progression;
pub mod projectile;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use boss::{BossAbility, BossDirector, BossKind, BossPhase, CombatBehavior};
pub use buffs::{Buff, BuffKind, BuffList};
pub use character::{Character, Trait};
pub use entity::{AnimState, EnemyKind, Entity, EntityKind, EntityVariant, Faction};
pub use events::GameEvent;
pub use hazard::{Hazard, HazardKind};
pub use ledger::{EconomyLedger, LoanOffer};
pub use leveling::{Pickup, PickupKind, Rarity, UpgradeChoice, UpgradeOffer, choose_upgrade};
pub use progression::{PermanentUpgrades, ProgressionStore, StatKey, StatMultipliers, UpgradeKey};
pub use projectile::{Projectile, Weapon};
pub use snapshot::{HudSnapshot, RenderSnapshot};
pub use state::{GamePhase, Player, RunConfig, SimulationContext, WorldBounds};
pub use tick::{TickInput, tick};
