//! Cross-run persistence
//!
//! The ledger and the permanent-upgrade record are stored as flat JSON
//! objects under fixed keys in a key-value store. Loading never fails: a
//! missing, malformed or out-of-range record is replaced wholesale with
//! defaults and a warning is logged.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use thiserror::Error;

use crate::sim::{EconomyLedger, PermanentUpgrades};

/// Storage key for the gold/debt pair
pub const LEDGER_KEY: &str = "goblins-inferno:debt";
/// Storage key for permanent upgrade levels and gems
pub const UPGRADES_KEY: &str = "goblins_meta_v1";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error")]
    Serde(#[from] serde_json::Error),
    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Read and validate the ledger record. `Ok(None)` when nothing is stored.
pub fn read_ledger(store: &impl KeyValueStore) -> Result<Option<EconomyLedger>, PersistError> {
    let Some(raw) = store.get(LEDGER_KEY)? else {
        return Ok(None);
    };
    let ledger: EconomyLedger = serde_json::from_str(&raw)?;
    validate_ledger(&ledger)?;
    Ok(Some(ledger))
}

fn validate_ledger(ledger: &EconomyLedger) -> Result<(), PersistError> {
    for (name, value) in [("debt", ledger.debt), ("gold", ledger.gold)] {
        if !value.is_finite() || value < 0.0 {
            return Err(PersistError::Invalid(format!("{name} = {value}")));
        }
    }
    Ok(())
}

/// Read and validate the permanent-upgrade record
pub fn read_upgrades(
    store: &impl KeyValueStore,
) -> Result<Option<PermanentUpgrades>, PersistError> {
    let Some(raw) = store.get(UPGRADES_KEY)? else {
        return Ok(None);
    };
    let upgrades: PermanentUpgrades = serde_json::from_str(&raw)?;
    if !upgrades.is_valid() {
        return Err(PersistError::Invalid("upgrade level above cap".into()));
    }
    Ok(Some(upgrades))
}

/// Load the ledger, falling back to `EconomyLedger::new(starting_debt)`
pub fn load_ledger(store: &impl KeyValueStore, starting_debt: f64) -> EconomyLedger {
    match read_ledger(store) {
        Ok(Some(ledger)) => {
            log::info!(
                "Loaded ledger: debt {:.2}, gold {:.2}",
                ledger.debt,
                ledger.gold
            );
            ledger
        }
        Ok(None) => {
            log::info!("No stored ledger, starting with debt {starting_debt:.0}");
            EconomyLedger::new(starting_debt)
        }
        Err(e) => {
            log::warn!("Discarding stored ledger ({e}), using defaults");
            EconomyLedger::new(starting_debt)
        }
    }
}

/// Load permanent upgrades, falling back to all-zero levels
pub fn load_upgrades(store: &impl KeyValueStore) -> PermanentUpgrades {
    match read_upgrades(store) {
        Ok(Some(upgrades)) => {
            log::info!("Loaded permanent upgrades ({} gems)", upgrades.gems);
            upgrades
        }
        Ok(None) => PermanentUpgrades::default(),
        Err(e) => {
            log::warn!("Discarding stored upgrades ({e}), using defaults");
            PermanentUpgrades::default()
        }
    }
}

pub fn save_ledger(store: &mut impl KeyValueStore, ledger: &EconomyLedger) -> Result<(), PersistError> {
    validate_ledger(ledger)?;
    store.set(LEDGER_KEY, &serde_json::to_string(ledger)?)
}

pub fn save_upgrades(
    store: &mut impl KeyValueStore,
    upgrades: &PermanentUpgrades,
) -> Result<(), PersistError> {
    store.set(UPGRADES_KEY, &serde_json::to_string(upgrades)?)
}
